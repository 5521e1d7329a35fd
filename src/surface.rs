use egui::{Color32, ColorImage, Rgba};

use crate::error::RenderingFailure;

/// How a paint combines with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint over (`source-over`)
    Paint,
    /// Remove coverage, producing transparency (`destination-out`)
    Erase,
}

/// The drawing target an engine exclusively owns.
///
/// Pixels are premultiplied, linear-space [`Rgba`]. `Clone` lets the engine keep
/// a baseline snapshot for history replay.
pub trait Surface: Clone {
    /// `[width, height]` in pixels
    fn size(&self) -> [usize; 2];

    /// Fails when the surface cannot currently be drawn on
    fn check_available(&self) -> Result<(), RenderingFailure> {
        Ok(())
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgba>;

    /// Blend a straight linear `color` with coverage `alpha` into one pixel.
    ///
    /// Out-of-bounds coordinates are ignored.
    fn blend(&mut self, x: usize, y: usize, color: [f32; 3], alpha: f32, mode: CompositeMode);

    /// Overwrite every pixel
    fn fill(&mut self, color: Rgba);
}

/// An in-memory RGBA bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl RasterSurface {
    /// Create a fully transparent surface
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color32::TRANSPARENT)
    }

    pub fn filled(width: usize, height: usize, color: Color32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::from(color); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at `(x, y)` converted back to sRGB
    pub fn color_at(&self, x: usize, y: usize) -> Option<Color32> {
        self.pixel(x, y).map(Color32::from)
    }

    /// Alpha of the pixel at `(x, y)`, 0.0 outside the surface
    pub fn alpha_at(&self, x: usize, y: usize) -> f32 {
        self.pixel(x, y).map(|p| p.a()).unwrap_or(0.0)
    }

    /// Number of pixels with any coverage
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a() > 0.0).count()
    }

    /// Convert to an egui image for uploading as a texture
    pub fn to_color_image(&self) -> ColorImage {
        let mut image = ColorImage::new([self.width, self.height], Color32::TRANSPARENT);
        for (dst, src) in image.pixels.iter_mut().zip(&self.pixels) {
            *dst = Color32::from(*src);
        }
        image
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    fn check_available(&self) -> Result<(), RenderingFailure> {
        if self.pixels.is_empty() {
            Err(RenderingFailure::SurfaceUnavailable(format!(
                "surface has no pixels ({}x{})",
                self.width, self.height
            )))
        } else {
            Ok(())
        }
    }

    fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn blend(&mut self, x: usize, y: usize, color: [f32; 3], alpha: f32, mode: CompositeMode) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0);
        let dst = self.pixels[i];
        let keep = 1.0 - alpha;
        self.pixels[i] = match mode {
            CompositeMode::Paint => Rgba::from_rgba_premultiplied(
                color[0] * alpha + dst.r() * keep,
                color[1] * alpha + dst.g() * keep,
                color[2] * alpha + dst.b() * keep,
                alpha + dst.a() * keep,
            ),
            CompositeMode::Erase => Rgba::from_rgba_premultiplied(
                dst.r() * keep,
                dst.g() * keep,
                dst.b() * keep,
                dst.a() * keep,
            ),
        };
    }

    fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }
}
