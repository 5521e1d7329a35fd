use super::{BrushRenderer, RenderContext};
use crate::brush::BrushConfig;
use crate::error::BrushResult;
use crate::geometry::{StrokeSegment, step_count};

/// Broad flat nib held at a fixed angle; thick across the nib, thin along it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalligraphyBrush;

impl BrushRenderer for CalligraphyBrush {
    fn label(&self) -> &'static str {
        "Calligraphy"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let rx = config.radius();
        let ry = (rx * config.params.nib_ratio).max(0.5);
        let angle = config.params.angle.to_radians();

        let mut mask = ctx.mask(segment.bounds(rx + 2.0));
        // The thin axis sets the spacing, otherwise strokes along it break up
        for point in segment.sample_points((ry * 0.5).max(0.25), ctx.max_substeps()) {
            mask.stamp_ellipse(point, rx, ry, angle, 0.95);
        }
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}

/// Pressure-less ink: fast movement thins the line, slow movement pools ink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBrush;

impl InkBrush {
    /// Width multiplier for a given smoothed speed
    pub fn width_factor(velocity: f32, size: f32) -> f32 {
        (1.2 - velocity / (size * 4.0).max(1.0)).clamp(0.35, 1.0)
    }
}

impl BrushRenderer for InkBrush {
    fn label(&self) -> &'static str {
        "Ink"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let base = config.radius();
        let target = base * Self::width_factor(ctx.dynamics.velocity, config.size);
        let from = ctx.dynamics.last_radius.unwrap_or(target);

        let mut mask = ctx.mask(segment.bounds(base + 2.0));
        if segment.is_dot() {
            mask.stamp_disc(segment.point, target, 1.0);
        } else {
            let spacing = (target.min(from) * 0.5).max(0.25);
            let steps = step_count(segment.length(), spacing, ctx.max_substeps());
            let start = segment.start();
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                let radius = from + (target - from) * t;
                mask.stamp_disc(start.lerp(segment.point, t), radius, 1.0);
            }
        }
        ctx.dynamics.last_radius = Some(target);
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}
