//! Applies renderer paints to a surface without stacking opacity inside a stroke.

use crate::brush::Paint;
use crate::surface::{CompositeMode, Surface};

/// Alpha already applied to each pixel by the current stroke, one plane per mode.
///
/// A pixel reaches `coverage * alpha` exactly once per stroke however many
/// segments overlap it: each composite only applies the increment
/// `(target - applied) / (1 - applied)` over what the stroke already laid down.
#[derive(Debug, Clone, Default)]
pub struct StrokeBuffer {
    size: [usize; 2],
    paint: Vec<f32>,
    erase: Vec<f32>,
}

impl StrokeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything the previous stroke applied; keeps the allocation
    pub fn reset(&mut self) {
        self.paint.fill(0.0);
        self.erase.fill(0.0);
    }

    /// Alpha the current stroke has applied at a pixel in `mode`
    pub fn applied(&self, x: usize, y: usize, mode: CompositeMode) -> f32 {
        if x >= self.size[0] || y >= self.size[1] {
            return 0.0;
        }
        self.plane(mode)
            .get(y * self.size[0] + x)
            .copied()
            .unwrap_or(0.0)
    }

    /// Composite one paint, returning the number of pixels that changed
    pub fn composite<S: Surface>(&mut self, surface: &mut S, paint: &Paint) -> usize {
        self.ensure(surface.size());
        let width = self.size[0];
        let mut changed = 0;
        for (x, y, coverage) in paint.mask.iter() {
            if x >= self.size[0] || y >= self.size[1] {
                continue;
            }
            let target = (coverage * paint.alpha).clamp(0.0, 1.0);
            let applied = match paint.mode {
                CompositeMode::Paint => &mut self.paint,
                CompositeMode::Erase => &mut self.erase,
            };
            let slot = &mut applied[y * width + x];
            if target <= *slot || *slot >= 1.0 {
                continue;
            }
            let increment = (target - *slot) / (1.0 - *slot);
            surface.blend(x, y, paint.color, increment, paint.mode);
            *slot = target;
            changed += 1;
        }
        changed
    }

    fn ensure(&mut self, size: [usize; 2]) {
        if self.size != size {
            self.size = size;
            self.paint = vec![0.0; size[0] * size[1]];
            self.erase = vec![0.0; size[0] * size[1]];
        }
    }

    fn plane(&self, mode: CompositeMode) -> &[f32] {
        match mode {
            CompositeMode::Paint => &self.paint,
            CompositeMode::Erase => &self.erase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::CoverageMask;
    use crate::surface::RasterSurface;
    use egui::{Rect, pos2};

    fn paint(center: egui::Pos2, alpha: f32, mode: CompositeMode) -> Paint {
        let mut mask = CoverageMask::new(Rect::from_center_size(center, egui::vec2(12.0, 12.0)), [32, 32]);
        mask.stamp_disc(center, 4.0, 1.0);
        Paint {
            mask,
            color: [1.0, 0.0, 0.0],
            alpha,
            mode,
        }
    }

    #[test]
    fn test_overlap_within_a_stroke_does_not_stack() {
        let mut surface = RasterSurface::new(32, 32);
        let mut buffer = StrokeBuffer::new();
        let first = paint(pos2(16.5, 16.5), 0.5, CompositeMode::Paint);
        assert!(buffer.composite(&mut surface, &first) > 0);
        for _ in 0..5 {
            assert_eq!(buffer.composite(&mut surface, &first), 0);
        }
        assert!((surface.alpha_at(16, 16) - 0.5).abs() < 1e-5);
        assert!((buffer.applied(16, 16, CompositeMode::Paint) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_raising_target_tops_up_exactly() {
        let mut surface = RasterSurface::new(32, 32);
        let mut buffer = StrokeBuffer::new();
        buffer.composite(&mut surface, &paint(pos2(16.5, 16.5), 0.3, CompositeMode::Paint));
        buffer.composite(&mut surface, &paint(pos2(16.5, 16.5), 0.8, CompositeMode::Paint));
        assert!((surface.alpha_at(16, 16) - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_new_stroke_stacks_after_reset() {
        let mut surface = RasterSurface::new(32, 32);
        let mut buffer = StrokeBuffer::new();
        let half = paint(pos2(16.5, 16.5), 0.5, CompositeMode::Paint);
        buffer.composite(&mut surface, &half);
        buffer.reset();
        buffer.composite(&mut surface, &half);
        assert!((surface.alpha_at(16, 16) - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_erase_removes_coverage() {
        let mut surface = RasterSurface::filled(32, 32, egui::Color32::WHITE);
        let mut buffer = StrokeBuffer::new();
        buffer.composite(&mut surface, &paint(pos2(16.5, 16.5), 1.0, CompositeMode::Erase));
        assert_eq!(surface.alpha_at(16, 16), 0.0);
        assert_eq!(surface.alpha_at(2, 2), 1.0);
    }
}
