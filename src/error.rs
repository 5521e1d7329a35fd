use thiserror::Error;

/// Errors caused by a brush configuration the engine cannot use.
///
/// These are surfaced to the caller of `configure`/`draw`; the stroke state
/// is never touched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown brush kind `{0}`")]
    UnknownBrushKind(String),

    #[error("brush {field} is not a number")]
    NotANumber { field: &'static str },

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("unknown texture `{0}`")]
    UnknownTexture(String),

    #[error("malformed brush configuration: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(error: serde_json::Error) -> Self {
        ConfigurationError::Malformed(error.to_string())
    }
}

/// Unexpected failures while rendering a single segment.
///
/// The engine logs these and treats the offending `draw` as a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderingFailure {
    #[error("drawing surface is unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("non-finite point ({x}, {y})")]
    NonFinitePoint { x: f32, y: f32 },

    #[error("renderer `{kind}` failed: {reason}")]
    Renderer { kind: String, reason: String },
}

/// Anything a brush renderer can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrushError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Rendering(#[from] RenderingFailure),
}

/// Result type for renderer operations
pub type BrushResult<T = ()> = Result<T, BrushError>;
