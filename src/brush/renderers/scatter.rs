use egui::vec2;
use rand::Rng;

use super::{BrushRenderer, RenderContext};
use crate::brush::BrushConfig;
use crate::error::BrushResult;
use crate::geometry::StrokeSegment;

/// Droplets per dab at density 1.0, per unit of radius
const DROPLETS_PER_RADIUS: f32 = 6.0;

/// Airbrush: random droplets scattered uniformly over the nozzle disc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprayBrush;

impl SprayBrush {
    fn droplets(config: &BrushConfig) -> usize {
        ((config.radius() * DROPLETS_PER_RADIUS * config.params.density).ceil() as usize).max(1)
    }
}

impl BrushRenderer for SprayBrush {
    fn label(&self) -> &'static str {
        "Spray"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let droplets = Self::droplets(config);
        let spacing = (radius * 0.5).max(1.0);

        let mut mask = ctx.mask(segment.bounds(radius + 2.0));
        for center in segment.sample_points(spacing, ctx.max_substeps()) {
            for _ in 0..droplets {
                let rng = &mut ctx.dynamics.rng;
                // sqrt keeps the droplets uniform over the area instead of bunching at the center
                let r = radius * rng.random::<f32>().sqrt();
                let theta = rng.random_range(0.0..std::f32::consts::TAU);
                let size = rng.random_range(0.5..=1.0);
                mask.stamp_disc(center + vec2(theta.cos(), theta.sin()) * r, size, 1.0);
            }
        }
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}
