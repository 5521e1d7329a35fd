use egui::{Pos2, Rect, vec2};

use super::{BrushRenderer, RenderContext};
use crate::brush::BrushConfig;
use crate::error::BrushResult;
use crate::geometry::StrokeSegment;
use crate::surface::CompositeMode;

/// Round tip rendered as an analytic capsule; also the eraser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundBrush {
    label: &'static str,
    /// Overrides the configured hardness when set
    hardness: Option<f32>,
    mode: CompositeMode,
}

impl RoundBrush {
    pub fn basic() -> Self {
        Self {
            label: "Brush",
            hardness: None,
            mode: CompositeMode::Paint,
        }
    }

    pub fn soft() -> Self {
        Self {
            label: "Soft",
            hardness: Some(0.0),
            mode: CompositeMode::Paint,
        }
    }

    pub fn eraser() -> Self {
        Self {
            label: "Eraser",
            hardness: None,
            mode: CompositeMode::Erase,
        }
    }
}

impl BrushRenderer for RoundBrush {
    fn label(&self) -> &'static str {
        self.label
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let hardness = self.hardness.unwrap_or(config.params.hardness);
        let mut mask = ctx.mask(segment.bounds(radius + 1.0));
        if segment.is_dot() {
            mask.stamp_disc(segment.point, radius, hardness);
        } else {
            mask.stamp_capsule(segment.start(), segment.point, radius, hardness);
        }
        ctx.emit_with_mode(mask, config, config.color, 1.0, self.mode);
        Ok(())
    }
}

/// Square felt tip stamped along the segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerBrush;

impl BrushRenderer for MarkerBrush {
    fn label(&self) -> &'static str {
        "Marker"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let half = config.radius();
        let hardness = config.params.hardness.max(0.9);
        let mut mask = ctx.mask(segment.bounds(half * 1.5 + 1.0));
        for point in segment.sample_points(config.step_distance(), ctx.max_substeps()) {
            mask.stamp_square(point, half, hardness);
        }
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}

/// Hard aliased pixels, walked with Bresenham so diagonals stay connected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBrush;

impl BrushRenderer for PixelBrush {
    fn label(&self) -> &'static str {
        "Pixel"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let side = config.size.round().max(1.0);
        // Walk only the cells that can reach the surface so integer math stays small
        let [width, height] = ctx.surface_size();
        let area = Rect::from_min_size(Pos2::ZERO, vec2(width as f32, height as f32)).expand(side + 1.0);
        let Some(segment) = segment.clipped(area) else {
            return Ok(());
        };
        let mut mask = ctx.mask(segment.bounds(side + 1.0));
        let cell = |p: Pos2| (p.x.floor() as i64, p.y.floor() as i64);
        let (mut x0, mut y0) = cell(segment.start());
        let (x1, y1) = cell(segment.point);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut steps = 0;
        loop {
            let center = Pos2::new(x0 as f32 + 0.5, y0 as f32 + 0.5);
            mask.stamp_aliased_square(center, side);
            if (x0 == x1 && y0 == y1) || steps >= ctx.max_substeps() {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            steps += 1;
        }
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}
