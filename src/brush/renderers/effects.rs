use egui::Color32;
use egui::ecolor::Hsva;

use super::{BrushRenderer, RenderContext};
use crate::brush::BrushConfig;
use crate::color;
use crate::error::BrushResult;
use crate::geometry::{StrokeSegment, step_count};

/// Glow tube: a wide faint halo around a bright, almost white core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeonBrush;

impl NeonBrush {
    const HALO_SCALE: f32 = 1.8;
    const HALO_STRENGTH: f32 = 0.35;
    const CORE_SCALE: f32 = 0.5;
}

impl BrushRenderer for NeonBrush {
    fn label(&self) -> &'static str {
        "Neon"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let (start, end) = (segment.start(), segment.point);

        let mut halo = ctx.mask(segment.bounds(radius * Self::HALO_SCALE + 2.0));
        halo.stamp_capsule(start, end, radius * Self::HALO_SCALE, 0.0);
        ctx.emit(halo, config, config.color, Self::HALO_STRENGTH);

        let mut core = ctx.mask(segment.bounds(radius + 2.0));
        core.stamp_capsule(start, end, (radius * Self::CORE_SCALE).max(0.5), 0.9);
        ctx.emit(core, config, color::with_lightness(config.color, 0.6), 1.0);
        Ok(())
    }
}

/// Cycles through the hue wheel with the distance travelled; the configured color only lends its alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainbowBrush;

impl RainbowBrush {
    /// Hue in [0, 1) after travelling `distance` pixels with a brush of `size`
    pub fn hue_at(distance: f32, size: f32) -> f32 {
        (distance / (size * 8.0).max(1.0)).rem_euclid(1.0)
    }
}

impl BrushRenderer for RainbowBrush {
    fn label(&self) -> &'static str {
        "Rainbow"
    }

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult {
        let radius = config.radius();
        let length = segment.length();
        let (_, alpha) = color::linear_channels(config.color);
        let travelled = ctx.dynamics.travelled;
        let bands = step_count(length, (config.size * 0.5).max(1.0), ctx.max_substeps());
        let (start, end) = (segment.start(), segment.point);

        for i in 0..bands {
            let (t0, t1) = (i as f32 / bands as f32, (i + 1) as f32 / bands as f32);
            let hue = Self::hue_at(travelled + length * (t0 + t1) * 0.5, config.size);
            let color = Color32::from(Hsva::new(hue, 0.85, 1.0, alpha));

            let (a, b) = (start.lerp(end, t0), start.lerp(end, t1));
            let mut mask = ctx.mask(egui::Rect::from_two_pos(a, b).expand(radius + 1.0));
            mask.stamp_capsule(a, b, radius, config.params.hardness);
            ctx.emit(mask, config, color, 1.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::brush::BrushKind;
    use crate::geometry::StrokeSegment;
    use egui::pos2;

    #[test]
    fn test_neon_core_is_brighter_than_its_halo() {
        let config = BrushConfig::new(BrushKind::Neon, Color32::from_rgb(0, 120, 255), 10.0, 1.0);
        let paints = render(BrushKind::Neon, &config, horizontal(48.5));
        assert_eq!(paints.len(), 2);
        let (halo, core) = (&paints[0], &paints[1]);
        assert!(halo.alpha < core.alpha);
        assert!(core.color[0] > halo.color[0]);
        // The halo reaches well past the core
        assert!(halo.mask.get(45, 55) > 0.0);
        assert_eq!(core.mask.get(45, 55), 0.0);
    }

    #[test]
    fn test_rainbow_hue_cycles() {
        assert_eq!(RainbowBrush::hue_at(0.0, 10.0), 0.0);
        assert!((RainbowBrush::hue_at(40.0, 10.0) - 0.5).abs() < 1e-6);
        assert!(RainbowBrush::hue_at(80.0, 10.0) < 1e-6);
    }

    #[test]
    fn test_rainbow_changes_color_along_the_stroke() {
        let config = BrushConfig::new(BrushKind::Rainbow, Color32::BLACK, 4.0, 1.0);
        let paints = render(BrushKind::Rainbow, &config, StrokeSegment::line(pos2(10.5, 40.5), pos2(26.5, 40.5)));
        assert!(paints.len() > 1);
        let first = paints.first().unwrap().color;
        let last = paints.last().unwrap().color;
        assert_ne!(first, last);
    }
}
