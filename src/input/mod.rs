//! Pointer input: client coordinates in, stroke calls out.

use egui::{PointerButton, Pos2};

pub mod adapter;
pub mod egui_input;
pub mod normalize;

pub use adapter::{PointerAdapter, StrokeSink};
pub use egui_input::{PointerSnapshot, PointerTracker};
pub use normalize::SurfaceViewport;

/// Pointer events in client (display) coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// A button was pressed
    Down { position: Pos2, button: PointerButton },
    /// The pointer moved
    Move {
        position: Pos2,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
    /// A button was released
    Up { position: Pos2, button: PointerButton },
    /// The pointer left the canvas or the window
    Leave { last_known_position: Pos2 },
}

impl PointerEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => *position,
            PointerEvent::Leave { last_known_position } => *last_known_position,
        }
    }
}
