//! Brush renderers and the registry that dispatches to them by [`BrushKind`].

mod calligraphy;
mod effects;
mod grain;
mod round;
mod scatter;
mod watercolor;

pub use calligraphy::{CalligraphyBrush, InkBrush};
pub use effects::{NeonBrush, RainbowBrush};
pub use grain::{CharcoalBrush, CrayonBrush, PencilBrush, TextureBrush};
pub use round::{MarkerBrush, PixelBrush, RoundBrush};
pub use scatter::SprayBrush;
pub use watercolor::WatercolorBrush;

use std::collections::HashMap;
use std::fmt;

use egui::{Color32, Rect};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::brush::texture::TextureLibrary;
use crate::brush::{BrushConfig, BrushKind, CoverageMask};
use crate::color;
use crate::error::BrushResult;
use crate::geometry::StrokeSegment;
use crate::surface::CompositeMode;

/// Per-stroke accumulators shared by every segment of one stroke
#[derive(Debug, Clone)]
pub struct StrokeDynamics {
    /// Seed the stroke's rng was created from; recorded for replay
    pub seed: u64,
    pub rng: StdRng,
    /// Number of segments rendered so far in this stroke
    pub segment_index: u32,
    /// Distance covered by the stroke before the current segment
    pub travelled: f32,
    /// Smoothed segment length, a stand-in for pointer speed
    pub velocity: f32,
    /// Radius the previous segment ended with, for brushes that taper
    pub last_radius: Option<f32>,
}

impl StrokeDynamics {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            segment_index: 0,
            travelled: 0.0,
            velocity: 0.0,
            last_radius: None,
        }
    }

    /// Fold a segment's length into the velocity estimate; call before rendering it
    pub fn observe(&mut self, segment: &StrokeSegment) {
        let length = segment.length();
        self.velocity = if self.segment_index == 0 {
            length
        } else {
            self.velocity * 0.6 + length * 0.4
        };
    }

    /// Account for a rendered segment
    pub fn advance(&mut self, segment: &StrokeSegment) {
        self.travelled += segment.length();
        self.segment_index += 1;
    }
}

/// Coverage plus the color and compositing it is applied with
#[derive(Debug, Clone)]
pub struct Paint {
    pub mask: CoverageMask,
    /// Straight (non-premultiplied) linear RGB
    pub color: [f32; 3],
    /// Alpha at full coverage, already including the configured opacity
    pub alpha: f32,
    pub mode: CompositeMode,
}

/// Everything a renderer may use while producing paints for one segment
pub struct RenderContext<'a> {
    surface_size: [usize; 2],
    max_substeps: usize,
    pub dynamics: &'a mut StrokeDynamics,
    pub textures: &'a TextureLibrary,
    paints: Vec<Paint>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        surface_size: [usize; 2],
        max_substeps: usize,
        dynamics: &'a mut StrokeDynamics,
        textures: &'a TextureLibrary,
    ) -> Self {
        Self {
            surface_size,
            max_substeps,
            dynamics,
            textures,
            paints: Vec::new(),
        }
    }

    pub fn surface_size(&self) -> [usize; 2] {
        self.surface_size
    }

    pub fn max_substeps(&self) -> usize {
        self.max_substeps
    }

    /// An empty mask covering `bounds`, clipped to the surface
    pub fn mask(&self, bounds: Rect) -> CoverageMask {
        CoverageMask::new(bounds, self.surface_size)
    }

    /// Paint `mask` with `color` at the configured opacity scaled by `strength`
    pub fn emit(&mut self, mask: CoverageMask, config: &BrushConfig, color: Color32, strength: f32) {
        self.emit_with_mode(mask, config, color, strength, CompositeMode::Paint);
    }

    pub fn emit_with_mode(
        &mut self,
        mask: CoverageMask,
        config: &BrushConfig,
        color: Color32,
        strength: f32,
        mode: CompositeMode,
    ) {
        if mask.is_empty() {
            return;
        }
        let (rgb, color_alpha) = color::linear_channels(color);
        let alpha = (config.opacity * strength.clamp(0.0, 1.0) * color_alpha).clamp(0.0, 1.0);
        self.paints.push(Paint {
            mask,
            color: rgb,
            alpha,
            mode,
        });
    }

    /// Paints emitted so far, in order
    pub fn into_paints(self) -> Vec<Paint> {
        self.paints
    }
}

/// Turns one stroke segment into paints.
///
/// Implementations must draw a visible dot when `segment.is_dot()`, leave no
/// gaps on long segments, combine sub-dabs without stacking opacity and
/// never touch the surface directly.
pub trait BrushRenderer {
    /// Human readable name for tool panels
    fn label(&self) -> &'static str;

    fn render(&self, segment: &StrokeSegment, config: &BrushConfig, ctx: &mut RenderContext<'_>) -> BrushResult;
}

/// Maps brush kinds to their renderers
pub struct BrushRegistry {
    renderers: HashMap<BrushKind, Box<dyn BrushRenderer>>,
}

impl fmt::Debug for BrushRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrushRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl Default for BrushRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl BrushRegistry {
    /// A registry without any renderers
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// A registry holding a renderer for every [`BrushKind::BUILTIN`] kind
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(BrushKind::Brush, RoundBrush::basic());
        registry.register(BrushKind::Soft, RoundBrush::soft());
        registry.register(BrushKind::Eraser, RoundBrush::eraser());
        registry.register(BrushKind::Watercolor, WatercolorBrush);
        registry.register(BrushKind::Calligraphy, CalligraphyBrush);
        registry.register(BrushKind::Ink, InkBrush);
        registry.register(BrushKind::Spray, SprayBrush);
        registry.register(BrushKind::Pencil, PencilBrush);
        registry.register(BrushKind::Charcoal, CharcoalBrush);
        registry.register(BrushKind::Crayon, CrayonBrush);
        registry.register(BrushKind::Marker, MarkerBrush);
        registry.register(BrushKind::Pixel, PixelBrush);
        registry.register(BrushKind::Texture, TextureBrush);
        registry.register(BrushKind::Neon, NeonBrush);
        registry.register(BrushKind::Rainbow, RainbowBrush);
        registry
    }

    /// Register or replace the renderer for `kind`, returning the previous one
    pub fn register(
        &mut self,
        kind: impl Into<BrushKind>,
        renderer: impl BrushRenderer + 'static,
    ) -> Option<Box<dyn BrushRenderer>> {
        self.renderers.insert(kind.into(), Box::new(renderer))
    }

    pub fn unregister(&mut self, kind: &BrushKind) -> Option<Box<dyn BrushRenderer>> {
        self.renderers.remove(kind)
    }

    pub fn get(&self, kind: &BrushKind) -> Option<&dyn BrushRenderer> {
        self.renderers.get(kind).map(|r| r.as_ref())
    }

    pub fn contains(&self, kind: &BrushKind) -> bool {
        self.renderers.contains_key(kind)
    }

    /// Registered kinds: built-ins in roster order, then custom kinds by name
    pub fn kinds(&self) -> Vec<BrushKind> {
        let mut kinds: Vec<BrushKind> = BrushKind::BUILTIN
            .into_iter()
            .filter(|kind| self.renderers.contains_key(kind))
            .collect();
        let mut custom: Vec<BrushKind> = self
            .renderers
            .keys()
            .filter(|kind| !kind.is_builtin())
            .cloned()
            .collect();
        custom.sort_by(|a, b| a.name().cmp(b.name()));
        kinds.extend(custom);
        kinds
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use egui::pos2;

    pub const SURFACE: [usize; 2] = [96, 96];

    /// Render one segment with a fresh stroke and return the paints
    pub fn render(kind: BrushKind, config: &BrushConfig, segment: StrokeSegment) -> Vec<Paint> {
        let registry = BrushRegistry::with_builtin();
        let textures = TextureLibrary::with_builtin();
        let mut dynamics = StrokeDynamics::new(42);
        dynamics.observe(&segment);
        let mut ctx = RenderContext::new(SURFACE, 4096, &mut dynamics, &textures);
        registry
            .get(&kind)
            .expect("builtin renderer")
            .render(&segment, config, &mut ctx)
            .expect("render succeeds");
        ctx.into_paints()
    }

    /// Highest alpha any paint reaches at a pixel
    pub fn peak_alpha(paints: &[Paint], x: usize, y: usize) -> f32 {
        paints
            .iter()
            .map(|p| p.mask.get(x, y) * p.alpha)
            .fold(0.0, f32::max)
    }

    pub fn horizontal(y: f32) -> StrokeSegment {
        StrokeSegment::line(pos2(20.5, y), pos2(70.5, y))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use egui::pos2;

    #[test]
    fn test_builtin_registry_covers_roster() {
        let registry = BrushRegistry::with_builtin();
        assert_eq!(registry.len(), BrushKind::BUILTIN.len());
        assert_eq!(registry.kinds(), BrushKind::BUILTIN.to_vec());
    }

    #[test]
    fn test_register_custom_kind() {
        let mut registry = BrushRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register("stamp", RoundBrush::basic()).is_none());
        assert!(registry.register("stamp", RoundBrush::soft()).is_some());
        assert!(registry.contains(&BrushKind::Custom("stamp".into())));
        assert_eq!(registry.get(&BrushKind::Custom("stamp".into())).unwrap().label(), "Soft");
    }

    #[test]
    fn test_every_builtin_draws_a_dot() {
        for kind in BrushKind::BUILTIN {
            let config = BrushConfig::new(kind.clone(), Color32::BLACK, 12.0, 1.0);
            let paints = render(kind.clone(), &config, StrokeSegment::dot(pos2(48.5, 48.5)));
            let covered: usize = paints.iter().map(|p| p.mask.iter().count()).sum();
            assert!(covered > 0, "{kind} left no mark for a dot");
        }
    }

    #[test]
    fn test_no_builtin_exceeds_opacity() {
        for kind in BrushKind::BUILTIN {
            let config = BrushConfig::new(kind.clone(), Color32::BLACK, 10.0, 0.4);
            let paints = render(kind.clone(), &config, horizontal(48.5));
            for paint in &paints {
                assert!(paint.alpha <= 0.4 + 1e-6, "{kind} paint alpha {}", paint.alpha);
                assert!(paint.mask.max_coverage() <= 1.0);
            }
        }
    }

    #[test]
    fn test_dynamics_velocity_smoothing() {
        let mut dynamics = StrokeDynamics::new(1);
        let first = StrokeSegment::line(pos2(0.0, 0.0), pos2(10.0, 0.0));
        dynamics.observe(&first);
        assert_eq!(dynamics.velocity, 10.0);
        dynamics.advance(&first);

        let second = StrokeSegment::line(pos2(10.0, 0.0), pos2(10.0, 0.0));
        dynamics.observe(&second);
        assert!((dynamics.velocity - 6.0).abs() < 1e-5);
        assert_eq!(dynamics.travelled, 10.0);
    }
}
