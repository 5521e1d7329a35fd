//! Dry media whose coverage is broken up by paper grain or a pattern.

use egui::{Vec2, vec2};
use rand::Rng;

use super::{BrushRenderer, RenderContext};
use crate::brush::texture::DEFAULT_TEXTURE;
use crate::brush::{BrushConfig, noise};
use crate::error::{BrushResult, ConfigurationError};
use crate::geometry::StrokeSegment;

// Grain belongs to the paper, so these seeds never change between strokes
const PENCIL_GRAIN_SEED: u32 = 29;
const CHARCOAL_GRAIN_SEED: u32 = 31;
const CRAYON_GRAIN_SEED: u32 = 37;

/// Thin graphite line with fine paper tooth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PencilBrush;

impl BrushRenderer for PencilBrush {
    fn label(&self) -> &'static str {
        "Pencil"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let mut mask = ctx.mask(segment.bounds(radius + 1.0));
        mask.stamp_capsule(segment.start(), segment.point, radius, config.params.hardness.max(0.7));
        mask.modulate(|x, y| 0.55 + 0.45 * noise::hash01(x as i32, y as i32, PENCIL_GRAIN_SEED));
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}

/// Crumbly stick: jittered soft dabs with coarse, patchy grain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharcoalBrush;

impl BrushRenderer for CharcoalBrush {
    fn label(&self) -> &'static str {
        "Charcoal"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let jitter = radius * 0.15;
        let mut mask = ctx.mask(segment.bounds(radius + jitter + 2.0));
        for point in segment.sample_points(config.step_distance(), ctx.max_substeps()) {
            let rng = &mut ctx.dynamics.rng;
            let offset = vec2(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0)) * jitter;
            mask.stamp_disc(point + offset, radius, 0.5);
        }
        mask.modulate(|x, y| {
            let (fx, fy) = (x as f32, y as f32);
            let clumps = noise::value_noise(fx, fy, 3.0, CHARCOAL_GRAIN_SEED);
            let tooth = noise::hash01(x as i32, y as i32, CHARCOAL_GRAIN_SEED + 1);
            0.2 + 0.8 * clumps * (0.5 + 0.5 * tooth)
        });
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}

/// Waxy streaks running along the direction of travel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrayonBrush;

impl BrushRenderer for CrayonBrush {
    fn label(&self) -> &'static str {
        "Crayon"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let along = segment.direction().unwrap_or(Vec2::X);
        let across = along.rot90();

        let mut mask = ctx.mask(segment.bounds(radius + 1.0));
        mask.stamp_capsule(segment.start(), segment.point, radius, 0.85);
        mask.modulate(|x, y| {
            let p = vec2(x as f32 + 0.5, y as f32 + 0.5);
            // Stretched lattice: slow variation along the stroke, fast across it
            let u = p.dot(along) / 6.0;
            let v = p.dot(across);
            0.4 + 0.6 * noise::value_noise(u, v, 1.5, CRAYON_GRAIN_SEED)
        });
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}

/// Round tip whose coverage is multiplied by a named pattern from the texture library
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBrush;

impl BrushRenderer for TextureBrush {
    fn label(&self) -> &'static str {
        "Texture"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let id = config.params.texture.as_deref().unwrap_or(DEFAULT_TEXTURE);
        let pattern = ctx
            .textures
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownTexture(id.to_string()))?;

        let radius = config.radius();
        let mut mask = ctx.mask(segment.bounds(radius + 1.0));
        mask.stamp_capsule(segment.start(), segment.point, radius, config.params.hardness);
        mask.modulate(|x, y| pattern.sample(x, y));
        ctx.emit(mask, config, config.color, 1.0);
        Ok(())
    }
}
