pub mod kind;
pub mod mask;
pub(crate) mod noise;
pub mod renderers;
pub mod texture;

pub use kind::BrushKind;
pub use mask::CoverageMask;
pub use renderers::{BrushRegistry, BrushRenderer, Paint, RenderContext, StrokeDynamics};
pub use texture::{Pattern, TextureError, TextureLibrary};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::ConfigurationError;

pub const MIN_BRUSH_SIZE: f32 = 0.5;
pub const MAX_BRUSH_SIZE: f32 = 512.0;
pub const MIN_SPACING: f32 = 0.02;
/// Dabs never sit further apart than half the brush diameter
pub const MAX_SPACING: f32 = 0.5;
pub const MIN_NIB_RATIO: f32 = 0.05;

/// Brush-specific extras. Kinds ignore the ones they don't use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushParams {
    /// Edge hardness: 0.0 = soft falloff, 1.0 = crisp anti-aliased edge
    pub hardness: f32,
    /// Distance between sub-step dabs as a fraction of the brush size
    pub spacing: f32,
    /// Droplet density for the spray brush
    pub density: f32,
    /// Nib angle in degrees for the calligraphy brush
    pub angle: f32,
    /// Minor/major axis ratio of the calligraphy nib
    pub nib_ratio: f32,
    /// Pattern used by the texture brush
    pub texture: Option<String>,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            hardness: 0.8,
            spacing: 0.25,
            density: 0.5,
            angle: 45.0,
            nib_ratio: 0.3,
            texture: None,
        }
    }
}

/// The full description of the brush applied to the next `draw` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushConfig {
    #[serde(rename = "type")]
    pub kind: BrushKind,
    #[serde(with = "color::hex")]
    pub color: Color32,
    /// Diameter in pixels
    pub size: f32,
    /// Multiplicative alpha for everything the brush draws
    pub opacity: f32,
    #[serde(default)]
    pub params: BrushParams,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            kind: BrushKind::Brush,
            color: Color32::BLACK,
            size: 8.0,
            opacity: 1.0,
            params: BrushParams::default(),
        }
    }
}

impl BrushConfig {
    pub fn new(kind: impl Into<BrushKind>, color: Color32, size: f32, opacity: f32) -> Self {
        Self {
            kind: kind.into(),
            color,
            size,
            opacity,
            params: BrushParams::default(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<BrushKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// Set the color from CSS text such as `#ff0000`
    pub fn with_color_str(mut self, color: &str) -> Result<Self, ConfigurationError> {
        self.color = color::parse_color(color)?;
        Ok(self)
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_params(mut self, params: BrushParams) -> Self {
        self.params = params;
        self
    }

    /// Parse a configuration from JSON, e.g. `{"type":"brush","color":"#ff0000","size":10,"opacity":1}`
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Absolute sub-step distance in pixels
    pub fn step_distance(&self) -> f32 {
        (self.size * self.params.spacing).max(0.5)
    }

    /// Clamp every numeric field into its valid range.
    ///
    /// Infinite values clamp to the nearest bound; NaN cannot be clamped and is
    /// reported as [`ConfigurationError::NotANumber`].
    pub fn sanitized(mut self) -> Result<Self, ConfigurationError> {
        self.size = clamp_field("size", self.size, MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)?;
        self.opacity = clamp_field("opacity", self.opacity, 0.0, 1.0)?;

        let params = &mut self.params;
        params.hardness = clamp_field("hardness", params.hardness, 0.0, 1.0)?;
        params.spacing = clamp_field("spacing", params.spacing, MIN_SPACING, MAX_SPACING)?;
        params.density = clamp_field("density", params.density, 0.0, 1.0)?;
        params.nib_ratio = clamp_field("nib_ratio", params.nib_ratio, MIN_NIB_RATIO, 1.0)?;
        params.angle = clamp_field("angle", params.angle, -f32::MAX, f32::MAX)?.rem_euclid(360.0);
        Ok(self)
    }
}

fn clamp_field(field: &'static str, value: f32, min: f32, max: f32) -> Result<f32, ConfigurationError> {
    if value.is_nan() {
        return Err(ConfigurationError::NotANumber { field });
    }
    Ok(value.clamp(min, max))
}
