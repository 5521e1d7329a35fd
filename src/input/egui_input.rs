use egui::{Context, InputState, PointerButton, Pos2, Rect};

use super::PointerEvent;

const BUTTONS: [PointerButton; 3] = [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle];

/// The parts of one frame's pointer state the tracker looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerSnapshot {
    pub hover_pos: Option<Pos2>,
    pub pressed: Vec<PointerButton>,
    pub released: Vec<PointerButton>,
    pub held: Vec<PointerButton>,
}

impl PointerSnapshot {
    pub fn from_input(input: &InputState) -> Self {
        let pointer = &input.pointer;
        Self {
            hover_pos: pointer.hover_pos(),
            pressed: buttons_where(|b| pointer.button_pressed(b)),
            released: buttons_where(|b| pointer.button_released(b)),
            held: buttons_where(|b| pointer.button_down(b)),
        }
    }
}

fn buttons_where(f: impl Fn(PointerButton) -> bool) -> Vec<PointerButton> {
    BUTTONS.into_iter().filter(|b| f(*b)).collect()
}

/// Converts egui frame input into [`PointerEvent`]s for one canvas rect.
///
/// Presses only count inside the canvas. Leaving the canvas or the window
/// while inside produces a `Leave`.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last_pointer_pos: Option<Pos2>,
    inside: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's raw egui input
    pub fn process_input(&mut self, ctx: &Context, canvas: Rect) -> Vec<PointerEvent> {
        let snapshot = ctx.input(PointerSnapshot::from_input);
        self.track(&snapshot, canvas)
    }

    pub fn track(&mut self, snapshot: &PointerSnapshot, canvas: Rect) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let pos = snapshot.hover_pos;
        let now_inside = pos.is_some_and(|p| canvas.contains(p));

        if let Some(pos) = pos.filter(|_| now_inside) {
            for button in &snapshot.pressed {
                events.push(PointerEvent::Down {
                    position: pos,
                    button: *button,
                });
            }
            if self.inside && Some(pos) != self.last_pointer_pos {
                events.push(PointerEvent::Move {
                    position: pos,
                    held_buttons: snapshot.held.clone(),
                });
            }
        }

        if let Some(position) = pos.or(self.last_pointer_pos) {
            for button in &snapshot.released {
                events.push(PointerEvent::Up {
                    position,
                    button: *button,
                });
            }
        }

        if self.inside && !now_inside {
            if let Some(last_known_position) = self.last_pointer_pos {
                events.push(PointerEvent::Leave { last_known_position });
            }
        }

        self.inside = now_inside;
        self.last_pointer_pos = if now_inside { pos } else { None };
        events
    }
}
