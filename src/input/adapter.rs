use egui::PointerButton;

use super::{PointerEvent, SurfaceViewport};
use crate::error::ConfigurationError;
use crate::geometry::Point;

/// Receiver of stroke calls, implemented by the engine
pub trait StrokeSink {
    fn draw(&mut self, point: Point, last_point: Option<Point>) -> Result<(), ConfigurationError>;
    fn end_stroke(&mut self);
}

/// Turns primary-button pointer events into draw / end_stroke calls.
///
/// Every primary `Down` yields one `draw(p, None)`, every `Move` while pressed
/// one `draw(p, Some(last))`, and every primary `Up` or `Leave` one `end_stroke`.
#[derive(Debug, Clone)]
pub struct PointerAdapter {
    viewport: SurfaceViewport,
    pressed: bool,
    last_point: Option<Point>,
}

impl PointerAdapter {
    pub fn new(viewport: SurfaceViewport) -> Self {
        Self {
            viewport,
            pressed: false,
            last_point: None,
        }
    }

    pub fn viewport(&self) -> &SurfaceViewport {
        &self.viewport
    }

    /// Update the display mapping, e.g. after the canvas was resized
    pub fn set_viewport(&mut self, viewport: SurfaceViewport) {
        self.viewport = viewport;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Last surface point handed to the sink in the current stroke
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Forward one event to `sink`; configuration errors from the sink are passed on
    pub fn handle(&mut self, event: &PointerEvent, sink: &mut impl StrokeSink) -> Result<(), ConfigurationError> {
        match event {
            PointerEvent::Down { position, button } => {
                if *button != PointerButton::Primary {
                    return Ok(());
                }
                self.pressed = true;
                self.last_point = None;
                self.draw_at(*position, sink)
            }
            PointerEvent::Move { position, held_buttons } => {
                if !self.pressed {
                    return Ok(());
                }
                if !held_buttons.contains(&PointerButton::Primary) {
                    // Release happened somewhere we never saw
                    self.finish(sink);
                    return Ok(());
                }
                self.draw_at(*position, sink)
            }
            PointerEvent::Up { button, .. } => {
                if *button == PointerButton::Primary {
                    self.finish(sink);
                }
                Ok(())
            }
            PointerEvent::Leave { .. } => {
                self.finish(sink);
                Ok(())
            }
        }
    }

    /// Forward a batch of events in order, stopping at the first error
    pub fn handle_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a PointerEvent>,
        sink: &mut impl StrokeSink,
    ) -> Result<(), ConfigurationError> {
        for event in events {
            self.handle(event, sink)?;
        }
        Ok(())
    }

    fn draw_at(&mut self, client: Point, sink: &mut impl StrokeSink) -> Result<(), ConfigurationError> {
        let Some(point) = self.viewport.normalize(client) else {
            log::debug!("Skipping draw: viewport is not drawable");
            return Ok(());
        };
        sink.draw(point, self.last_point)?;
        self.last_point = Some(point);
        Ok(())
    }

    fn finish(&mut self, sink: &mut impl StrokeSink) {
        self.pressed = false;
        self.last_point = None;
        sink.end_stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Rect, pos2, vec2};

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
        fail: bool,
    }

    impl StrokeSink for Recorder {
        fn draw(&mut self, point: Point, last_point: Option<Point>) -> Result<(), ConfigurationError> {
            if self.fail {
                return Err(ConfigurationError::UnknownBrushKind("nope".into()));
            }
            match last_point {
                Some(last) => self.calls.push(format!("draw {},{} from {},{}", point.x, point.y, last.x, last.y)),
                None => self.calls.push(format!("draw {},{}", point.x, point.y)),
            }
            Ok(())
        }

        fn end_stroke(&mut self) {
            self.calls.push("end".into());
        }
    }

    fn adapter() -> PointerAdapter {
        // 200x100 surface shown at half size at (10, 10)
        PointerAdapter::new(SurfaceViewport::new(
            Rect::from_min_size(pos2(10.0, 10.0), vec2(100.0, 50.0)),
            [200, 100],
        ))
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down {
            position: pos2(x, y),
            button: PointerButton::Primary,
        }
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move {
            position: pos2(x, y),
            held_buttons: vec![PointerButton::Primary],
        }
    }

    #[test]
    fn test_down_move_up_sequence() {
        let mut adapter = adapter();
        let mut sink = Recorder::default();
        let events = [
            down(20.0, 20.0),
            moved(30.0, 20.0),
            PointerEvent::Up {
                position: pos2(30.0, 20.0),
                button: PointerButton::Primary,
            },
        ];
        adapter.handle_all(&events, &mut sink).unwrap();
        assert_eq!(sink.calls, vec!["draw 20,20", "draw 40,20 from 20,20", "end"]);
        assert!(!adapter.is_pressed());
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut adapter = adapter();
        let mut sink = Recorder::default();
        adapter.handle(&moved(30.0, 20.0), &mut sink).unwrap();
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let mut adapter = adapter();
        let mut sink = Recorder::default();
        let event = PointerEvent::Down {
            position: pos2(20.0, 20.0),
            button: PointerButton::Secondary,
        };
        adapter.handle(&event, &mut sink).unwrap();
        assert!(sink.calls.is_empty());
        assert!(!adapter.is_pressed());
    }

    #[test]
    fn test_move_without_primary_held_ends_stroke() {
        let mut adapter = adapter();
        let mut sink = Recorder::default();
        adapter.handle(&down(20.0, 20.0), &mut sink).unwrap();
        let released = PointerEvent::Move {
            position: pos2(25.0, 20.0),
            held_buttons: vec![],
        };
        adapter.handle(&released, &mut sink).unwrap();
        adapter.handle(&moved(30.0, 20.0), &mut sink).unwrap();
        assert_eq!(sink.calls, vec!["draw 20,20", "end"]);
    }

    #[test]
    fn test_undrawable_viewport_still_ends_strokes() {
        let mut adapter = PointerAdapter::new(SurfaceViewport::unscaled(Pos2::ZERO, [0, 0]));
        let mut sink = Recorder::default();
        adapter.handle(&down(1.0, 1.0), &mut sink).unwrap();
        adapter.handle(&moved(2.0, 1.0), &mut sink).unwrap();
        adapter
            .handle(&PointerEvent::Leave { last_known_position: pos2(2.0, 1.0) }, &mut sink)
            .unwrap();
        assert_eq!(sink.calls, vec!["end"]);
    }

    #[test]
    fn test_sink_errors_are_returned() {
        let mut adapter = adapter();
        let mut sink = Recorder {
            fail: true,
            ..Default::default()
        };
        let err = adapter.handle(&down(20.0, 20.0), &mut sink).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownBrushKind("nope".into()));
        assert_eq!(adapter.last_point(), None);
    }
}
