use egui::{Pos2, Rect, pos2};

/// Maps client (display) coordinates onto a surface's intrinsic pixel grid.
///
/// The surface may be shown scaled: `display` is where it appears on screen,
/// `intrinsic` its real `[width, height]` in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceViewport {
    pub display: Rect,
    pub intrinsic: [usize; 2],
}

impl SurfaceViewport {
    pub fn new(display: Rect, intrinsic: [usize; 2]) -> Self {
        Self { display, intrinsic }
    }

    /// Viewport showing the surface at 1:1 with its top-left corner at `origin`
    pub fn unscaled(origin: Pos2, intrinsic: [usize; 2]) -> Self {
        let size = egui::vec2(intrinsic[0] as f32, intrinsic[1] as f32);
        Self::new(Rect::from_min_size(origin, size), intrinsic)
    }

    /// False when a zero or non-finite dimension makes the mapping undefined
    pub fn is_drawable(&self) -> bool {
        let size = self.display.size();
        self.display.min.is_finite()
            && size.x.is_finite()
            && size.y.is_finite()
            && size.x > 0.0
            && size.y > 0.0
            && self.intrinsic[0] > 0
            && self.intrinsic[1] > 0
    }

    /// Surface-space point for a client position, `None` if the viewport is not drawable.
    ///
    /// Points outside the display rect map outside the surface; they are not clamped.
    pub fn normalize(&self, client: Pos2) -> Option<Pos2> {
        if !self.is_drawable() {
            return None;
        }
        let size = self.display.size();
        Some(pos2(
            (client.x - self.display.left()) * self.intrinsic[0] as f32 / size.x,
            (client.y - self.display.top()) * self.intrinsic[1] as f32 / size.y,
        ))
    }

    pub fn contains(&self, client: Pos2) -> bool {
        self.display.contains(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_display() {
        // 1000x500 surface shown at 500x250, offset by (100, 50)
        let viewport = SurfaceViewport::new(
            Rect::from_min_size(pos2(100.0, 50.0), egui::vec2(500.0, 250.0)),
            [1000, 500],
        );
        assert_eq!(viewport.normalize(pos2(350.0, 175.0)), Some(pos2(500.0, 250.0)));
        assert_eq!(viewport.normalize(pos2(100.0, 50.0)), Some(pos2(0.0, 0.0)));
    }

    #[test]
    fn test_unscaled_is_a_translation() {
        let viewport = SurfaceViewport::unscaled(pos2(10.0, 20.0), [64, 64]);
        assert_eq!(viewport.normalize(pos2(15.5, 25.5)), Some(pos2(5.5, 5.5)));
    }

    #[test]
    fn test_points_outside_are_not_clamped() {
        let viewport = SurfaceViewport::unscaled(Pos2::ZERO, [10, 10]);
        assert_eq!(viewport.normalize(pos2(-4.0, 12.0)), Some(pos2(-4.0, 12.0)));
        assert!(!viewport.contains(pos2(-4.0, 12.0)));
    }

    #[test]
    fn test_degenerate_viewports_are_not_drawable() {
        let zero_display = SurfaceViewport::new(Rect::from_min_size(Pos2::ZERO, egui::vec2(0.0, 10.0)), [10, 10]);
        assert!(!zero_display.is_drawable());
        assert_eq!(zero_display.normalize(pos2(1.0, 1.0)), None);

        let zero_surface = SurfaceViewport::unscaled(Pos2::ZERO, [0, 10]);
        assert_eq!(zero_surface.normalize(pos2(1.0, 1.0)), None);

        let nan = SurfaceViewport::new(
            Rect::from_min_size(pos2(f32::NAN, 0.0), egui::vec2(10.0, 10.0)),
            [10, 10],
        );
        assert!(!nan.is_drawable());
    }
}
