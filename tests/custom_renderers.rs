use egui::{Color32, pos2};
use image::{DynamicImage, Rgba, RgbaImage};
use museo_paint::brush::{BrushConfig, BrushKind, BrushParams, BrushRenderer, RenderContext};
use museo_paint::engine::Engine;
use museo_paint::error::{BrushResult, RenderingFailure};
use museo_paint::geometry::StrokeSegment;
use museo_paint::surface::RasterSurface;

/// Renderer that gives up on every segment
struct BrittleBrush;

impl BrushRenderer for BrittleBrush {
    fn label(&self) -> &'static str {
        "Brittle"
    }

    fn render(&self, _segment: &StrokeSegment, _config: &BrushConfig, _ctx: &mut RenderContext<'_>) -> BrushResult {
        Err(RenderingFailure::Renderer {
            kind: "brittle".into(),
            reason: "nib snapped".into(),
        }
        .into())
    }
}

fn solid(width: u32, height: u32, pixel: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(pixel)))
}

#[test]
fn test_failing_renderer_mid_stroke_is_a_counted_no_op() {
    let mut engine = Engine::new(RasterSurface::new(64, 64));
    assert!(engine.registry_mut().register("brittle", BrittleBrush).is_none());

    let brush = BrushConfig::new(BrushKind::Brush, Color32::BLACK, 6.0, 1.0);
    engine.configure(brush.clone()).unwrap();
    engine.draw(pos2(10.5, 10.5), None).unwrap();
    let surface = engine.surface().clone();
    let revision = engine.revision();

    engine.configure(brush.clone().with_kind("brittle")).unwrap();
    assert!(engine.draw(pos2(40.5, 10.5), Some(pos2(10.5, 10.5))).is_ok());
    assert_eq!(engine.failure_count(), 1);
    assert_eq!(
        engine.last_failure(),
        Some(&RenderingFailure::Renderer {
            kind: "brittle".into(),
            reason: "nib snapped".into(),
        })
    );
    assert!(engine.is_drawing());
    assert_eq!(engine.last_point(), Some(pos2(10.5, 10.5)));
    assert_eq!(engine.revision(), revision);
    assert_eq!(engine.surface(), &surface);

    engine.configure(brush).unwrap();
    engine.draw(pos2(40.5, 10.5), Some(pos2(10.5, 10.5))).unwrap();
    assert_eq!(engine.last_point(), Some(pos2(40.5, 10.5)));
    assert!(engine.surface().alpha_at(30, 10) > 0.99);
    assert_eq!(engine.failure_count(), 1);
    engine.end_stroke();

    // Only the segments that rendered were recorded
    assert_eq!(engine.history()[0].segment_count(), 2);
}

#[test]
fn test_host_textures_shape_the_texture_brush() {
    let mut engine = Engine::new(RasterSurface::new(64, 64));
    engine
        .textures_mut()
        .insert_image("solid", &solid(4, 4, [255, 255, 255, 255]))
        .unwrap();
    engine
        .textures_mut()
        .insert_image("blank", &solid(4, 4, [255, 255, 255, 0]))
        .unwrap();

    let textured = |id: &str| {
        BrushConfig::new(BrushKind::Texture, Color32::BLACK, 10.0, 1.0).with_params(BrushParams {
            hardness: 1.0,
            texture: Some(id.to_string()),
            ..Default::default()
        })
    };

    engine.configure(textured("blank")).unwrap();
    engine.draw(pos2(10.5, 32.5), None).unwrap();
    engine.draw(pos2(50.5, 32.5), Some(pos2(10.5, 32.5))).unwrap();
    engine.end_stroke();
    assert_eq!(engine.surface().painted_pixels(), 0);

    engine.configure(textured("solid")).unwrap();
    engine.draw(pos2(10.5, 32.5), None).unwrap();
    engine.draw(pos2(50.5, 32.5), Some(pos2(10.5, 32.5))).unwrap();
    engine.end_stroke();
    assert!((engine.surface().alpha_at(30, 32) - 1.0).abs() < 1e-4);
}
