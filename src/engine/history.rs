use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brush::BrushConfig;
use crate::geometry::StrokeSegment;

/// Consecutive segments of one stroke drawn with the same configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRun {
    pub config: BrushConfig,
    pub segments: Vec<StrokeSegment>,
}

/// Everything needed to redraw one stroke exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub id: Uuid,
    /// Seed of the stroke's random source
    pub seed: u64,
    pub runs: Vec<StrokeRun>,
}

impl StrokeRecord {
    pub fn new(seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            seed,
            runs: Vec::new(),
        }
    }

    /// Append a rendered segment, opening a new run when the configuration changed
    pub fn push(&mut self, config: &BrushConfig, segment: StrokeSegment) {
        match self.runs.last_mut() {
            Some(run) if run.config == *config => run.segments.push(segment),
            _ => self.runs.push(StrokeRun {
                config: config.clone(),
                segments: vec![segment],
            }),
        }
    }

    /// Whether pushing a segment drawn with `config` would open a new run
    pub fn opens_run(&self, config: &BrushConfig) -> bool {
        self.runs.last().is_none_or(|run| run.config != *config)
    }

    pub fn segment_count(&self) -> usize {
        self.runs.iter().map(|run| run.segments.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Every segment in drawing order with the configuration it was drawn with
    pub fn segments(&self) -> impl Iterator<Item = (&BrushConfig, &StrokeSegment)> + '_ {
        self.runs
            .iter()
            .flat_map(|run| run.segments.iter().map(move |segment| (&run.config, segment)))
    }
}

/// Committed strokes available for undo, plus the surface they are replayed onto
#[derive(Debug, Clone)]
pub struct StrokeHistory<S> {
    /// Surface state before the oldest undoable stroke
    baseline: S,
    undo_stack: Vec<StrokeRecord>,
    redo_stack: Vec<StrokeRecord>,
    limit: usize,
}

impl<S: Clone> StrokeHistory<S> {
    pub fn new(baseline: S, limit: usize) -> Self {
        Self {
            baseline,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Commit a finished stroke. Clears the redo stack.
    ///
    /// Returns the oldest record when the limit is exceeded; the caller must
    /// bake it into [`Self::baseline_mut`].
    pub fn push(&mut self, record: StrokeRecord) -> Option<StrokeRecord> {
        self.redo_stack.clear();
        if !self.is_enabled() {
            return None;
        }
        self.undo_stack.push(record);
        self.evict()
    }

    /// Move the newest stroke to the redo stack
    pub fn undo(&mut self) -> Option<&StrokeRecord> {
        let record = self.undo_stack.pop()?;
        self.redo_stack.push(record);
        self.redo_stack.last()
    }

    /// Move the most recently undone stroke back; returns it and any evicted record
    pub fn redo(&mut self) -> Option<(StrokeRecord, Option<StrokeRecord>)> {
        let record = self.redo_stack.pop()?;
        self.undo_stack.push(record.clone());
        Some((record, self.evict()))
    }

    fn evict(&mut self) -> Option<StrokeRecord> {
        (self.undo_stack.len() > self.limit).then(|| self.undo_stack.remove(0))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undoable strokes, oldest first
    pub fn records(&self) -> &[StrokeRecord] {
        &self.undo_stack
    }

    pub fn baseline(&self) -> &S {
        &self.baseline
    }

    pub fn baseline_mut(&mut self) -> &mut S {
        &mut self.baseline
    }

    /// Drop every record and start over from `baseline`
    pub fn reset(&mut self, baseline: S) {
        self.baseline = baseline;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
