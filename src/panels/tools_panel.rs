use egui::Slider;

use crate::CanvasApp;
use crate::brush::{BrushKind, MAX_BRUSH_SIZE, MAX_SPACING, MIN_BRUSH_SIZE, MIN_NIB_RATIO, MIN_SPACING};
use crate::brush::texture::DEFAULT_TEXTURE;

pub fn tools_panel(app: &mut CanvasApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Brush");

            let mut brush = app.prefs.brush.clone();
            let kinds = app.engine.registry().kinds();
            let label_of = |kind: &BrushKind| {
                app.engine
                    .registry()
                    .get(kind)
                    .map(|renderer| renderer.label().to_owned())
                    .unwrap_or_else(|| kind.to_string())
            };

            egui::ComboBox::from_id_salt("brush_kind")
                .selected_text(label_of(&brush.kind))
                .show_ui(ui, |ui| {
                    for kind in &kinds {
                        ui.selectable_value(&mut brush.kind, kind.clone(), label_of(kind));
                    }
                });

            ui.horizontal(|ui| {
                ui.label("Color");
                ui.color_edit_button_srgba(&mut brush.color);
            });
            ui.add(Slider::new(&mut brush.size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).logarithmic(true).text("Size"));
            ui.add(Slider::new(&mut brush.opacity, 0.0..=1.0).text("Opacity"));
            ui.add(Slider::new(&mut brush.params.hardness, 0.0..=1.0).text("Hardness"));
            ui.add(Slider::new(&mut brush.params.spacing, MIN_SPACING..=MAX_SPACING).text("Spacing"));

            match brush.kind {
                BrushKind::Calligraphy => {
                    ui.add(Slider::new(&mut brush.params.angle, 0.0..=359.0).text("Nib angle"));
                    ui.add(Slider::new(&mut brush.params.nib_ratio, MIN_NIB_RATIO..=1.0).text("Nib ratio"));
                }
                BrushKind::Spray => {
                    ui.add(Slider::new(&mut brush.params.density, 0.0..=1.0).text("Density"));
                }
                BrushKind::Texture => {
                    let current = brush.params.texture.clone().unwrap_or_else(|| DEFAULT_TEXTURE.to_owned());
                    egui::ComboBox::from_id_salt("brush_texture")
                        .selected_text(current.as_str())
                        .show_ui(ui, |ui| {
                            for id in app.engine.textures().ids() {
                                if ui.selectable_label(current == id, id).clicked() {
                                    brush.params.texture = Some(id.to_owned());
                                }
                            }
                        });
                }
                _ => {}
            }

            if brush != app.prefs.brush {
                log::debug!("Brush changed in tool panel: {}", brush.kind);
                app.prefs.brush = brush;
                app.apply_brush();
            }

            if let Some(status) = &app.status {
                ui.colored_label(ui.visuals().error_fg_color, status);
            }
            ui.separator();

            if ui.button("Clear").clicked() {
                app.engine.clear();
            }

            ui.label(format!("Strokes: {}", app.engine.history().len()));
            if app.engine.failure_count() > 0 {
                ui.label(format!("Skipped draws: {}", app.engine.failure_count()));
            }
        });
}
