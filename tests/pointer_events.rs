use egui::{Color32, PointerButton, Pos2, Rect, pos2, vec2};
use museo_paint::brush::{BrushConfig, BrushKind};
use museo_paint::engine::Engine;
use museo_paint::error::ConfigurationError;
use museo_paint::input::{PointerAdapter, PointerEvent, StrokeSink, SurfaceViewport};
use museo_paint::surface::RasterSurface;

/// Counts the calls an adapter makes
#[derive(Debug, Default)]
struct CountingSink {
    dots: usize,
    segments: usize,
    ends: usize,
}

impl StrokeSink for CountingSink {
    fn draw(&mut self, _point: Pos2, last_point: Option<Pos2>) -> Result<(), ConfigurationError> {
        match last_point {
            Some(_) => self.segments += 1,
            None => self.dots += 1,
        }
        Ok(())
    }

    fn end_stroke(&mut self) {
        self.ends += 1;
    }
}

fn down(position: Pos2) -> PointerEvent {
    PointerEvent::Down {
        position,
        button: PointerButton::Primary,
    }
}

fn drag(position: Pos2) -> PointerEvent {
    PointerEvent::Move {
        position,
        held_buttons: vec![PointerButton::Primary],
    }
}

#[test]
fn test_down_then_leave_ends_exactly_once() {
    let mut adapter = PointerAdapter::new(SurfaceViewport::unscaled(Pos2::ZERO, [64, 64]));
    let mut sink = CountingSink::default();
    let events = [
        down(pos2(10.0, 10.0)),
        PointerEvent::Leave {
            last_known_position: pos2(10.0, 10.0),
        },
    ];
    adapter.handle_all(&events, &mut sink).unwrap();
    assert_eq!((sink.dots, sink.segments, sink.ends), (1, 0, 1));
}

#[test]
fn test_every_move_while_pressed_is_one_segment() {
    let mut adapter = PointerAdapter::new(SurfaceViewport::unscaled(Pos2::ZERO, [64, 64]));
    let mut sink = CountingSink::default();
    let mut events = vec![down(pos2(1.0, 1.0))];
    events.extend((2..12).map(|i| drag(pos2(i as f32, 1.0))));
    events.push(PointerEvent::Up {
        position: pos2(11.0, 1.0),
        button: PointerButton::Primary,
    });
    adapter.handle_all(&events, &mut sink).unwrap();
    assert_eq!((sink.dots, sink.segments, sink.ends), (1, 10, 1));
}

#[test]
fn test_scaled_canvas_drives_the_engine() {
    // 64x64 surface displayed at 4x, offset by the tool panel
    let display = Rect::from_min_size(pos2(200.0, 0.0), vec2(256.0, 256.0));
    let mut adapter = PointerAdapter::new(SurfaceViewport::new(display, [64, 64]));
    let mut engine = Engine::new(RasterSurface::new(64, 64));
    engine
        .configure(BrushConfig::new(BrushKind::Marker, Color32::BLACK, 4.0, 1.0))
        .unwrap();

    let events = [
        down(pos2(242.0, 130.0)),
        drag(pos2(402.0, 130.0)),
        PointerEvent::Leave {
            last_known_position: pos2(402.0, 130.0),
        },
    ];
    adapter.handle_all(&events, &mut engine).unwrap();

    assert!(!engine.is_drawing());
    assert_eq!(engine.history().len(), 1);
    // Client x 242..402 maps to surface x 10.5..50.5 on row 32
    for x in 11..=50 {
        assert!(engine.surface().alpha_at(x, 32) > 0.99, "x={x}");
    }
    assert_eq!(engine.surface().alpha_at(32, 10), 0.0);
}

#[test]
fn test_configuration_errors_reach_the_host() {
    let mut adapter = PointerAdapter::new(SurfaceViewport::unscaled(Pos2::ZERO, [16, 16]));
    let mut engine = Engine::new(RasterSurface::new(16, 16));
    engine.configure(BrushConfig::default().with_kind("stamp")).unwrap();

    let err = adapter.handle(&down(pos2(4.0, 4.0)), &mut engine).unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownBrushKind("stamp".into()));

    // Leaving still ends the (never started) stroke cleanly
    adapter
        .handle(
            &PointerEvent::Leave {
                last_known_position: pos2(4.0, 4.0),
            },
            &mut engine,
        )
        .unwrap();
    assert!(!engine.is_drawing());
    assert!(engine.history().is_empty());
}
