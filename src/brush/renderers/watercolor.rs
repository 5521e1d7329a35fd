use rand::Rng;

use super::{BrushRenderer, RenderContext};
use crate::brush::noise;
use crate::brush::BrushConfig;
use crate::color;
use crate::error::BrushResult;
use crate::geometry::StrokeSegment;

/// Coverage of the wash interior relative to its darker rim
const WASH_BODY: f32 = 0.8;
/// Strength of the faint bleed around the wash
const BLEED_STRENGTH: f32 = 0.25;

/// Translucent wash: jittered soft blobs, pigment variation and a darker drying edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatercolorBrush;

impl BrushRenderer for WatercolorBrush {
    fn label(&self) -> &'static str {
        "Watercolor"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let points = segment.sample_points(config.step_distance(), ctx.max_substeps());
        let seed = ctx.dynamics.seed as u32;

        let mut wash = ctx.mask(segment.bounds(radius * 1.2 + 2.0));
        let mut rim = ctx.mask(segment.bounds(radius * 1.2 + 2.0));
        let mut bleed = ctx.mask(segment.bounds(radius * 2.0 + 2.0));
        for point in points {
            let jitter = radius * 0.08;
            let offset = egui::vec2(
                ctx.dynamics.rng.random_range(-1.0..=1.0) * jitter,
                ctx.dynamics.rng.random_range(-1.0..=1.0) * jitter,
            );
            let blob_radius = radius * ctx.dynamics.rng.random_range(0.92..=1.08);
            let center = point + offset;

            wash.stamp_disc(center, blob_radius, 0.55);
            // Pigment gathers where the wash dries: a thin ring at the blob edge
            rim.stamp_disc(center, blob_radius, 0.9);
            bleed.stamp_disc(center, blob_radius * 1.8, 0.0);
        }

        // Interior keeps WASH_BODY, the rim rises toward full coverage
        let inner = wash.clone();
        rim.modulate(|x, y| {
            let body = inner.get(x, y);
            if body >= 0.999 { WASH_BODY } else { 1.0 }
        });
        rim.modulate(|x, y| 0.9 + 0.1 * noise::value_noise(x as f32, y as f32, radius.max(2.0), seed));

        let pigment = color::with_lightness(config.color, -0.08);
        ctx.emit(bleed, config, config.color, BLEED_STRENGTH);
        ctx.emit(rim, config, pigment, 1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::brush::{BrushConfig, BrushKind};
    use egui::Color32;

    #[test]
    fn test_wash_stays_under_opacity_and_has_no_gaps() {
        let config = BrushConfig::new(BrushKind::Watercolor, Color32::BLUE, 10.0, 0.6);
        let paints = render(BrushKind::Watercolor, &config, horizontal(48.5));
        assert_eq!(paints.len(), 2);
        for x in 21..=70 {
            let alpha = peak_alpha(&paints, x, 48);
            assert!(alpha > 0.3, "gap at {x}");
            assert!(alpha <= 0.6 + 1e-5);
        }
    }

    #[test]
    fn test_bleed_reaches_past_the_wash() {
        let config = BrushConfig::new(BrushKind::Watercolor, Color32::BLUE, 10.0, 1.0);
        let paints = render(BrushKind::Watercolor, &config, horizontal(48.5));
        let bleed = &paints[0];
        let body = &paints[1];
        assert!(bleed.mask.get(45, 55) > 0.0);
        assert_eq!(body.mask.get(45, 55), 0.0);
    }
}
