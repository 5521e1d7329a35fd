use std::ops::Range;

use egui::{Pos2, Rect, Vec2};

use crate::brush::noise::smoothstep;
use crate::geometry::distance_to_line_segment;

/// Per-segment coverage buffer, clipped to the surface.
///
/// Overlapping stamps combine with `max`, so painting the same pixel twice in
/// one segment never darkens it. Pixel `(x, y)` has its center at `(x + 0.5, y + 0.5)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

impl CoverageMask {
    /// Create an empty mask covering `bounds` (surface coordinates) clipped to `surface_size`
    pub fn new(bounds: Rect, surface_size: [usize; 2]) -> Self {
        let clip = |lo: f32, hi: f32, limit: usize| -> (usize, usize) {
            if !lo.is_finite() || !hi.is_finite() {
                return (0, 0);
            }
            let start = lo.floor().clamp(0.0, limit as f32) as usize;
            let end = hi.ceil().clamp(0.0, limit as f32) as usize;
            (start, end.max(start))
        };
        let (x0, x1) = clip(bounds.min.x, bounds.max.x, surface_size[0]);
        let (y0, y1) = clip(bounds.min.y, bounds.max.y, surface_size[1]);
        let (width, height) = (x1 - x0, y1 - y0);

        Self {
            x0,
            y0,
            width,
            height,
            coverage: vec![0.0; width * height],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.is_empty()
    }

    /// Top-left pixel of the mask in surface coordinates
    pub fn origin(&self) -> [usize; 2] {
        [self.x0, self.y0]
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    /// Coverage at a surface pixel, 0.0 outside the mask
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.index(x, y).map(|i| self.coverage[i]).unwrap_or(0.0)
    }

    pub fn max_coverage(&self) -> f32 {
        self.coverage.iter().copied().fold(0.0, f32::max)
    }

    /// Raise the coverage of one pixel to at least `value`
    pub fn accumulate(&mut self, x: usize, y: usize, value: f32) {
        if let Some(i) = self.index(x, y) {
            let slot = &mut self.coverage[i];
            *slot = slot.max(value.clamp(0.0, 1.0));
        }
    }

    /// Surface pixels with non-zero coverage
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0.0)
            .map(|(i, c)| (self.x0 + i % self.width, self.y0 + i / self.width, *c))
    }

    /// Multiply each pixel's coverage by `factor(x, y)`, clamped to [0, 1]
    pub fn modulate(&mut self, mut factor: impl FnMut(usize, usize) -> f32) {
        for i in 0..self.coverage.len() {
            if self.coverage[i] > 0.0 {
                let (x, y) = (self.x0 + i % self.width, self.y0 + i / self.width);
                self.coverage[i] = (self.coverage[i] * factor(x, y)).clamp(0.0, 1.0);
            }
        }
    }

    /// Round dab
    pub fn stamp_disc(&mut self, center: Pos2, radius: f32, hardness: f32) {
        self.stamp_shape(center, radius + 1.0, |p| {
            edge_coverage(p.distance(center), radius, hardness)
        });
    }

    /// Round-capped line from `a` to `b`; gap-free for any segment length
    pub fn stamp_capsule(&mut self, a: Pos2, b: Pos2, radius: f32, hardness: f32) {
        let pad = radius + 1.0;
        let bounds = Rect::from_two_pos(a, b).expand(pad);
        self.for_each_pixel(bounds, |p| {
            edge_coverage(distance_to_line_segment(p, a, b), radius, hardness)
        });
    }

    /// Elliptical dab with semi-axes `rx`, `ry`, rotated by `angle` radians
    pub fn stamp_ellipse(&mut self, center: Pos2, rx: f32, ry: f32, angle: f32, hardness: f32) {
        let (sin, cos) = angle.sin_cos();
        let rx = rx.max(0.25);
        let ry = ry.max(0.25);
        self.stamp_shape(center, rx.max(ry) + 1.0, |p| {
            let d = p - center;
            let u = d.x * cos + d.y * sin;
            let v = -d.x * sin + d.y * cos;
            let q = ((u / rx).powi(2) + (v / ry).powi(2)).sqrt();
            let dist = d.length();
            if q < 1e-6 {
                return edge_coverage(0.0, rx.min(ry), hardness);
            }
            // Radius of the ellipse along the direction of this pixel
            edge_coverage(dist, dist / q, hardness)
        });
    }

    /// Axis-aligned square dab with the given half side length
    pub fn stamp_square(&mut self, center: Pos2, half: f32, hardness: f32) {
        self.stamp_shape(center, half * std::f32::consts::SQRT_2 + 1.0, |p| {
            let d = p - center;
            edge_coverage(d.x.abs().max(d.y.abs()), half, hardness)
        });
    }

    /// Fully cover every pixel whose center falls inside the square, without anti-aliasing
    pub fn stamp_aliased_square(&mut self, center: Pos2, side: f32) {
        let side = side.max(1.0);
        let left = (center.x - side / 2.0).round();
        let top = (center.y - side / 2.0).round();
        let bounds = Rect::from_min_size(Pos2::new(left, top), Vec2::splat(side.round().max(1.0)));
        let Some((xs, ys)) = self.pixel_range(bounds) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                self.accumulate(x, y, 1.0);
            }
        }
    }

    fn stamp_shape(&mut self, center: Pos2, extent: f32, coverage: impl Fn(Pos2) -> f32) {
        let bounds = Rect::from_center_size(center, Vec2::splat(extent * 2.0));
        self.for_each_pixel(bounds, coverage);
    }

    fn for_each_pixel(&mut self, bounds: Rect, coverage: impl Fn(Pos2) -> f32) {
        let Some((xs, ys)) = self.pixel_range(bounds) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let value = coverage(Pos2::new(x as f32 + 0.5, y as f32 + 0.5));
                if value > 0.0 {
                    self.accumulate(x, y, value);
                }
            }
        }
    }

    fn pixel_range(&self, bounds: Rect) -> Option<(Range<usize>, Range<usize>)> {
        if self.is_empty() || !bounds.min.is_finite() || !bounds.max.is_finite() {
            return None;
        }
        let clamp_x = |v: f32| (v.max(self.x0 as f32) as usize).min(self.x0 + self.width);
        let clamp_y = |v: f32| (v.max(self.y0 as f32) as usize).min(self.y0 + self.height);
        let xs = clamp_x(bounds.min.x.floor())..clamp_x(bounds.max.x.ceil());
        let ys = clamp_y(bounds.min.y.floor())..clamp_y(bounds.max.y.ceil());
        (!xs.is_empty() && !ys.is_empty()).then_some((xs, ys))
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        let (lx, ly) = (x.checked_sub(self.x0)?, y.checked_sub(self.y0)?);
        (lx < self.width && ly < self.height).then(|| ly * self.width + lx)
    }
}

/// Coverage of a round footprint at `distance` from its center.
///
/// The fully hard part extends to `radius * hardness`, then falls off smoothly;
/// the rim is anti-aliased over one pixel.
pub fn edge_coverage(distance: f32, radius: f32, hardness: f32) -> f32 {
    let rim = (radius + 0.5 - distance).clamp(0.0, 1.0);
    if rim <= 0.0 {
        return 0.0;
    }
    let inner = radius * hardness.clamp(0.0, 1.0);
    if distance <= inner || radius - inner < 1e-3 {
        return rim;
    }
    let t = (distance - inner) / (radius - inner);
    (1.0 - smoothstep(t)).min(rim)
}
