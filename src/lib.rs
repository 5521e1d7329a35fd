#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod brush;
mod canvas_texture;
pub mod color;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
mod panels;
pub mod surface;

pub use app::{CanvasApp, CanvasPrefs};
pub use brush::{BrushConfig, BrushKind, BrushParams, BrushRegistry, BrushRenderer};
pub use engine::{Engine, EngineSettings, StrokePhase, StrokeRecord};
pub use error::{BrushError, BrushResult, ConfigurationError, RenderingFailure};
pub use geometry::{Point, StrokeSegment};
pub use input::{PointerAdapter, PointerEvent, PointerTracker, StrokeSink, SurfaceViewport};
pub use surface::{CompositeMode, RasterSurface, Surface};
