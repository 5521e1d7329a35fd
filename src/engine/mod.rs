//! The stroke session manager: owns one surface and turns draw calls into pixels.

pub mod compositor;
pub mod history;

pub use compositor::StrokeBuffer;
pub use history::{StrokeHistory, StrokeRecord, StrokeRun};

use egui::{Color32, Rgba};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::brush::{BrushConfig, BrushRegistry, RenderContext, StrokeDynamics, TextureLibrary};
use crate::color;
use crate::error::{BrushError, ConfigurationError, RenderingFailure};
use crate::geometry::{Point, StrokeSegment};
use crate::input::adapter::StrokeSink;
use crate::surface::{RasterSurface, Surface};

/// Engine-wide knobs that are not part of a brush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum number of undoable strokes; 0 disables history
    pub history_limit: usize,
    /// Stroke seeds are drawn from a generator seeded with this
    pub seed: u64,
    /// Upper bound on sub-steps a renderer walks for one segment
    pub max_substeps: usize,
    /// Color `clear` fills the surface with
    #[serde(with = "color::hex")]
    pub background: Color32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_limit: 64,
            seed: 0x6d75_7365_6f33_64,
            max_substeps: 4096,
            background: Color32::TRANSPARENT,
        }
    }
}

/// Where the engine is within a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokePhase {
    Idle,
    Active { last_point: Point },
}

/// Per-stroke state, dropped as a whole when the stroke ends
#[derive(Debug)]
struct ActiveStroke {
    dynamics: StrokeDynamics,
    record: StrokeRecord,
}

/// The drawing engine.
///
/// One engine owns exactly one surface: the surface is moved in by
/// [`Engine::new`] and only handed back by [`Engine::into_surface`].
pub struct Engine<S: Surface = RasterSurface> {
    surface: S,
    config: BrushConfig,
    registry: BrushRegistry,
    textures: TextureLibrary,
    settings: EngineSettings,
    phase: StrokePhase,
    stroke: Option<ActiveStroke>,
    buffer: StrokeBuffer,
    history: StrokeHistory<S>,
    seeds: StdRng,
    revision: u64,
    failure_count: u64,
    last_failure: Option<RenderingFailure>,
}

impl<S: Surface> Engine<S> {
    pub fn new(surface: S) -> Self {
        Self::with_settings(surface, EngineSettings::default())
    }

    pub fn with_settings(surface: S, settings: EngineSettings) -> Self {
        let history = StrokeHistory::new(surface.clone(), settings.history_limit);
        Self {
            surface,
            config: BrushConfig::default(),
            registry: BrushRegistry::with_builtin(),
            textures: TextureLibrary::with_builtin(),
            seeds: StdRng::seed_from_u64(settings.seed),
            settings,
            phase: StrokePhase::Idle,
            stroke: None,
            buffer: StrokeBuffer::new(),
            history,
            revision: 0,
            failure_count: 0,
            last_failure: None,
        }
    }

    /// Replace the brush configuration; takes effect on the next `draw`.
    ///
    /// Finite out-of-range values are clamped. A NaN field is rejected and the
    /// previous configuration is kept. Never ends the current stroke.
    pub fn configure(&mut self, config: BrushConfig) -> Result<(), ConfigurationError> {
        let config = config.sanitized().inspect_err(|e| {
            log::warn!("Rejected brush configuration: {}", e);
        })?;
        if !self.registry.contains(&config.kind) {
            log::warn!("No renderer registered for brush `{}` yet", config.kind);
        }
        log::debug!("Configured {} brush, size {}", config.kind, config.size);
        self.config = config;
        Ok(())
    }

    /// The active configuration, as sanitized by `configure`
    pub fn config(&self) -> BrushConfig {
        self.config.clone()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Render one segment of the current stroke.
    ///
    /// `last_point == None` starts a new stroke with a dot at `point`.
    /// Configuration problems are returned; rendering failures are logged,
    /// counted and treated as a no-op. Either way a failed call leaves the
    /// stroke and the surface as they were.
    pub fn draw(&mut self, point: Point, last_point: Option<Point>) -> Result<(), ConfigurationError> {
        let segment = StrokeSegment::new(point, last_point);
        match self.try_draw(segment) {
            Ok(()) => Ok(()),
            Err(BrushError::Configuration(e)) => {
                log::warn!("Draw rejected: {}", e);
                Err(e)
            }
            Err(BrushError::Rendering(failure)) => {
                log::error!("Draw skipped: {}", failure);
                self.failure_count += 1;
                self.last_failure = Some(failure);
                Ok(())
            }
        }
    }

    fn try_draw(&mut self, segment: StrokeSegment) -> Result<(), BrushError> {
        self.surface.check_available()?;
        if !segment.is_finite() {
            let bad = [Some(segment.point), segment.last_point]
                .into_iter()
                .flatten()
                .find(|p| !p.is_finite())
                .unwrap_or(segment.point);
            return Err(RenderingFailure::NonFinitePoint { x: bad.x, y: bad.y }.into());
        }
        let renderer = self
            .registry
            .get(&self.config.kind)
            .ok_or_else(|| ConfigurationError::UnknownBrushKind(self.config.kind.to_string()))?;

        let starts_stroke = segment.last_point.is_none() || self.stroke.is_none();
        let mut seeds = self.seeds.clone();
        let mut dynamics = match (&self.stroke, starts_stroke) {
            (Some(active), false) => active.dynamics.clone(),
            _ => StrokeDynamics::new(seeds.random()),
        };

        // Render against scratch dynamics so a failure leaves the stroke untouched
        dynamics.observe(&segment);
        let paints = {
            let mut ctx = RenderContext::new(
                self.surface.size(),
                self.settings.max_substeps,
                &mut dynamics,
                &self.textures,
            );
            renderer.render(&segment, &self.config, &mut ctx)?;
            ctx.into_paints()
        };
        dynamics.advance(&segment);

        if starts_stroke {
            self.commit_stroke();
            self.buffer.reset();
            self.seeds = seeds;
            log::debug!("Stroke started at ({:.1}, {:.1})", segment.point.x, segment.point.y);
            self.stroke = Some(ActiveStroke {
                record: StrokeRecord::new(dynamics.seed),
                dynamics,
            });
        } else if let Some(active) = self.stroke.as_mut() {
            active.dynamics = dynamics;
            if active.record.opens_run(&self.config) {
                // A new configuration paints over the stroke's own earlier pixels
                self.buffer.reset();
            }
        }

        let changed: usize = paints
            .iter()
            .map(|paint| self.buffer.composite(&mut self.surface, paint))
            .sum();
        if changed > 0 {
            self.revision += 1;
        }
        if let Some(active) = self.stroke.as_mut() {
            active.record.push(&self.config, segment);
        }
        self.phase = StrokePhase::Active { last_point: segment.point };
        Ok(())
    }

    /// Finish the current stroke. Calling it while idle does nothing.
    pub fn end_stroke(&mut self) {
        self.commit_stroke();
        self.phase = StrokePhase::Idle;
    }

    fn commit_stroke(&mut self) {
        let Some(active) = self.stroke.take() else {
            return;
        };
        log::debug!(
            "Stroke {} ended after {} segments",
            active.record.id,
            active.record.segment_count()
        );
        if active.record.is_empty() {
            return;
        }
        if let Some(evicted) = self.history.push(active.record) {
            log::debug!("Baking stroke {} into the history baseline", evicted.id);
            replay(
                self.history.baseline_mut(),
                &evicted,
                &self.registry,
                &self.textures,
                self.settings.max_substeps,
            );
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, StrokePhase::Active { .. })
    }

    pub fn state(&self) -> StrokePhase {
        self.phase
    }

    pub fn last_point(&self) -> Option<Point> {
        match self.phase {
            StrokePhase::Active { last_point } => Some(last_point),
            StrokePhase::Idle => None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give the surface back, ending the engine's ownership of it
    pub fn into_surface(mut self) -> S {
        self.end_stroke();
        self.surface
    }

    pub fn registry(&self) -> &BrushRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BrushRegistry {
        &mut self.registry
    }

    pub fn textures(&self) -> &TextureLibrary {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureLibrary {
        &mut self.textures
    }

    /// Increments whenever surface pixels change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of draws skipped because of a rendering failure
    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn last_failure(&self) -> Option<&RenderingFailure> {
        self.last_failure.as_ref()
    }

    /// Committed, undoable strokes, oldest first
    pub fn history(&self) -> &[StrokeRecord] {
        self.history.records()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || (self.stroke.is_some() && self.history.is_enabled())
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn export_history_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self.history.records())
    }

    /// Remove the newest stroke, ending an active one first.
    ///
    /// The surface is rebuilt from the history baseline. Returns false when
    /// there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let Some(undone) = self.history.undo().map(|record| record.id) else {
            return false;
        };
        let mut surface = self.history.baseline().clone();
        for record in self.history.records() {
            replay(
                &mut surface,
                record,
                &self.registry,
                &self.textures,
                self.settings.max_substeps,
            );
        }
        self.surface = surface;
        self.revision += 1;
        log::info!("Undid stroke {}", undone);
        true
    }

    /// Redraw the most recently undone stroke
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        let Some((record, evicted)) = self.history.redo() else {
            return false;
        };
        replay(
            &mut self.surface,
            &record,
            &self.registry,
            &self.textures,
            self.settings.max_substeps,
        );
        if let Some(evicted) = evicted {
            replay(
                self.history.baseline_mut(),
                &evicted,
                &self.registry,
                &self.textures,
                self.settings.max_substeps,
            );
        }
        self.revision += 1;
        log::info!("Redid stroke {}", record.id);
        true
    }

    /// Fill the surface with the background color and forget all history
    pub fn clear(&mut self) {
        self.stroke = None;
        self.phase = StrokePhase::Idle;
        self.surface.fill(Rgba::from(self.settings.background));
        self.history.reset(self.surface.clone());
        self.revision += 1;
        log::info!("Canvas cleared");
    }
}

impl<S: Surface> StrokeSink for Engine<S> {
    fn draw(&mut self, point: Point, last_point: Option<Point>) -> Result<(), ConfigurationError> {
        Engine::draw(self, point, last_point)
    }

    fn end_stroke(&mut self) {
        Engine::end_stroke(self)
    }
}

/// Redraw a recorded stroke onto `surface` with its original seed
fn replay<S: Surface>(
    surface: &mut S,
    record: &StrokeRecord,
    registry: &BrushRegistry,
    textures: &TextureLibrary,
    max_substeps: usize,
) {
    let mut dynamics = StrokeDynamics::new(record.seed);
    let mut buffer = StrokeBuffer::new();
    for run in &record.runs {
        buffer.reset();
        let config = &run.config;
        let Some(renderer) = registry.get(&config.kind) else {
            log::warn!("Replay skipped a run: no renderer for `{}`", config.kind);
            continue;
        };
        for segment in &run.segments {
            // Only segments that rendered live were recorded, so a failure here is non-fatal
            let mut scratch = dynamics.clone();
            scratch.observe(segment);
            let mut ctx = RenderContext::new(surface.size(), max_substeps, &mut scratch, textures);
            if let Err(e) = renderer.render(segment, config, &mut ctx) {
                log::warn!("Replay of stroke {} skipped a segment: {}", record.id, e);
                continue;
            }
            for paint in ctx.into_paints() {
                buffer.composite(surface, &paint);
            }
            scratch.advance(segment);
            dynamics = scratch;
        }
    }
}
