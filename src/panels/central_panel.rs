use egui::{Color32, Rect, Sense, pos2, vec2};

use crate::CanvasApp;
use crate::input::SurfaceViewport;
use crate::surface::Surface;

/// Largest rect with the surface's aspect ratio centered in `available`
pub fn fit_to(available: Rect, size: [usize; 2]) -> Rect {
    let (w, h) = (size[0].max(1) as f32, size[1].max(1) as f32);
    let scale = (available.width() / w).min(available.height() / h).max(0.0);
    Rect::from_center_size(available.center(), vec2(w * scale, h * scale))
}

pub fn central_panel(app: &mut CanvasApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
        let size = app.engine.surface().size();
        let display = fit_to(response.rect, size);

        app.adapter.set_viewport(SurfaceViewport::new(display, size));
        let events = app.tracker.process_input(ctx, display);
        if let Err(e) = app.adapter.handle_all(&events, &mut app.engine) {
            app.status = Some(e.to_string());
        }

        let engine = &app.engine;
        let texture = app
            .texture
            .texture_id(ctx, engine.revision(), || engine.surface().to_color_image());
        painter.rect_filled(display, 0.0, Color32::from_gray(40));
        painter.image(
            texture,
            display,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        let available = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 400.0));
        let display = fit_to(available, [200, 100]);
        assert_eq!(display.size(), vec2(400.0, 200.0));
        assert_eq!(display.center(), available.center());
    }

    #[test]
    fn test_fit_is_empty_for_empty_space() {
        let available = Rect::from_min_size(pos2(10.0, 10.0), vec2(0.0, 300.0));
        assert_eq!(fit_to(available, [64, 64]).width(), 0.0);
    }
}
