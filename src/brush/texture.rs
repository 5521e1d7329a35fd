use std::collections::HashMap;

use image::DynamicImage;
use thiserror::Error;

use crate::brush::noise;

/// Errors that can occur while registering a pattern texture
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Texture has no pixels")]
    Empty,
}

/// Pattern used when a texture brush has no texture configured
pub const DEFAULT_TEXTURE: &str = "canvas";

/// A tiling grayscale pattern; each value multiplies brush coverage
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl Pattern {
    /// Build a pattern from a generator evaluated on every texel
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y).clamp(0.0, 1.0));
            }
        }
        Self { width, height, values }
    }

    /// Luminance times alpha of an image; white opaque texels let paint through
    pub fn from_image(image: &DynamicImage) -> Result<Self, TextureError> {
        let rgba = image.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let values = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                let luma = (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) / 255.0;
                luma * (a as f32 / 255.0)
            })
            .collect();
        Ok(Self { width, height, values })
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    /// Sample with wrap-around tiling
    pub fn sample(&self, x: usize, y: usize) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values[(y % self.height) * self.width + (x % self.width)]
    }
}

/// Named pattern textures available to the texture brush
#[derive(Debug, Clone)]
pub struct TextureLibrary {
    patterns: HashMap<String, Pattern>,
}

impl Default for TextureLibrary {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl TextureLibrary {
    /// An empty library
    pub fn new() -> Self {
        Self {
            patterns: HashMap::new(),
        }
    }

    /// Library holding the procedural patterns `canvas`, `crosshatch`, `dots`, `stripes` and `paper`
    pub fn with_builtin() -> Self {
        let mut library = Self::new();
        library.insert(
            "canvas",
            Pattern::from_fn(8, 8, |x, y| {
                let weave = if (x / 2 + y / 2) % 2 == 0 { 1.0 } else { 0.7 };
                weave * (0.85 + 0.15 * noise::hash01(x as i32, y as i32, 11))
            }),
        );
        library.insert(
            "crosshatch",
            Pattern::from_fn(8, 8, |x, y| if (x + y) % 4 == 0 || (x + 8 - y % 8) % 4 == 0 { 1.0 } else { 0.15 }),
        );
        library.insert(
            "dots",
            Pattern::from_fn(6, 6, |x, y| {
                let (dx, dy) = (x as f32 - 2.5, y as f32 - 2.5);
                if dx * dx + dy * dy <= 4.0 { 1.0 } else { 0.0 }
            }),
        );
        library.insert("stripes", Pattern::from_fn(6, 1, |x, _| if x < 3 { 1.0 } else { 0.0 }));
        library.insert(
            "paper",
            Pattern::from_fn(64, 64, |x, y| {
                0.55 + 0.45 * noise::value_noise(x as f32, y as f32, 3.0, 17)
            }),
        );
        library
    }

    /// Register or replace a pattern, returning the previous one
    pub fn insert(&mut self, id: impl Into<String>, pattern: Pattern) -> Option<Pattern> {
        self.patterns.insert(id.into(), pattern)
    }

    pub fn insert_image(&mut self, id: impl Into<String>, image: &DynamicImage) -> Result<(), TextureError> {
        let pattern = Pattern::from_image(image)?;
        self.insert(id, pattern);
        Ok(())
    }

    /// Decode an encoded image (PNG, JPEG, ...) and register it
    pub fn load_from_memory(&mut self, id: impl Into<String>, bytes: &[u8]) -> Result<(), TextureError> {
        let id = id.into();
        let image = image::load_from_memory(bytes)?;
        log::debug!("Decoded texture {}: {}x{}", id, image.width(), image.height());
        self.insert_image(id, &image)
    }

    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    /// Registered pattern names, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
