use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

/// A surface-local pixel coordinate.
pub type Point = Pos2;

/// Segments shorter than this are rendered as dots
pub const DEGENERATE_LENGTH: f32 = 1e-3;

/// One incremental draw call within a stroke.
///
/// `last_point == None` marks the first segment of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    pub last_point: Option<Point>,
    pub point: Point,
}

impl StrokeSegment {
    pub fn new(point: Point, last_point: Option<Point>) -> Self {
        Self { last_point, point }
    }

    pub fn dot(point: Point) -> Self {
        Self::new(point, None)
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self::new(to, Some(from))
    }

    /// Start of the segment (the point itself for dots)
    pub fn start(&self) -> Point {
        self.last_point.unwrap_or(self.point)
    }

    pub fn length(&self) -> f32 {
        self.last_point
            .map(|last| last.distance(self.point))
            .unwrap_or(0.0)
    }

    /// True for the first segment of a stroke and for zero-length segments
    pub fn is_dot(&self) -> bool {
        self.length() < DEGENERATE_LENGTH
    }

    /// Unit direction of travel, if the segment has one
    pub fn direction(&self) -> Option<egui::Vec2> {
        if self.is_dot() {
            None
        } else {
            Some((self.point - self.start()).normalized())
        }
    }

    pub fn is_finite(&self) -> bool {
        self.point.is_finite() && self.last_point.is_none_or(|p| p.is_finite())
    }

    /// Bounding box of the segment grown by `padding` on every side
    pub fn bounds(&self, padding: f32) -> Rect {
        calculate_bounds(&[self.start(), self.point], padding)
    }

    /// The part of the segment inside `area`, or `None` if it misses it entirely.
    ///
    /// Segments spanning the whole `f32` range are measured from the point nearest
    /// `area`, so the clipped ends stay pixel accurate.
    pub fn clipped(&self, area: Rect) -> Option<Self> {
        let Some(last) = self.last_point else {
            return area.contains(self.point).then_some(*self);
        };
        if area.contains(last) && area.contains(self.point) {
            return Some(*self);
        }
        let (ax, ay) = (last.x as f64, last.y as f64);
        let (dx, dy) = (self.point.x as f64 - ax, self.point.y as f64 - ay);
        let len = dx.hypot(dy);
        if len == 0.0 {
            return area.contains(self.point).then_some(*self);
        }
        let (ux, uy) = (dx / len, dy / len);
        let center = area.center();
        let t = ((center.x as f64 - ax) * ux + (center.y as f64 - ay) * uy).clamp(0.0, len);
        let (ox, oy) = (ax + ux * t, ay + uy * t);

        let edges = [
            (-ux, ox - area.min.x as f64),
            (ux, area.max.x as f64 - ox),
            (-uy, oy - area.min.y as f64),
            (uy, area.max.y as f64 - oy),
        ];
        let (mut s0, mut s1) = (-t, len - t);
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                s0 = s0.max(r);
            } else {
                s1 = s1.min(r);
            }
            if s0 > s1 {
                return None;
            }
        }
        let at = |s: f64| Pos2::new((ox + ux * s) as f32, (oy + uy * s) as f32);
        Some(Self::line(at(s0), at(s1)))
    }

    /// Evenly spaced points from start to end, endpoints included.
    ///
    /// A dot yields just its point. At most `max_steps + 1` points are produced.
    pub fn sample_points(&self, spacing: f32, max_steps: usize) -> Vec<Point> {
        if self.is_dot() {
            return vec![self.point];
        }
        let steps = step_count(self.length(), spacing, max_steps);
        let start = self.start();
        (0..=steps)
            .map(|i| start.lerp(self.point, i as f32 / steps as f32))
            .collect()
    }
}

/// Number of sub-steps needed so consecutive samples are at most `spacing` apart
pub fn step_count(length: f32, spacing: f32, max_steps: usize) -> usize {
    let spacing = spacing.max(0.25);
    ((length / spacing).ceil() as usize).clamp(1, max_steps.max(1))
}

/// Calculate distance from a point to a line segment
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    // f64 keeps squared lengths finite for far-off endpoints
    let (sx, sy) = (line_start.x as f64, line_start.y as f64);
    let (lx, ly) = (line_end.x as f64 - sx, line_end.y as f64 - sy);
    let (px, py) = (point.x as f64 - sx, point.y as f64 - sy);

    let len_sq = lx * lx + ly * ly;
    if len_sq == 0.0 {
        return px.hypot(py) as f32;
    }

    let t = ((px * lx + py * ly) / len_sq).clamp(0.0, 1.0);
    (px - lx * t).hypot(py - ly * t) as f32
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_dot_detection() {
        assert!(StrokeSegment::dot(pos2(3.0, 4.0)).is_dot());
        assert!(StrokeSegment::line(pos2(3.0, 4.0), pos2(3.0, 4.0)).is_dot());
        assert!(!StrokeSegment::line(pos2(0.0, 0.0), pos2(1.0, 0.0)).is_dot());
    }

    #[test]
    fn test_sample_points_cover_gaps() {
        let segment = StrokeSegment::line(pos2(0.0, 0.0), pos2(50.0, 0.0));
        let points = segment.sample_points(2.5, 4096);

        assert_eq!(points.len(), 21);
        assert_eq!(points[0], pos2(0.0, 0.0));
        assert_eq!(*points.last().unwrap(), pos2(50.0, 0.0));
        for pair in points.windows(2) {
            assert!(pair[0].distance(pair[1]) <= 2.5 + 1e-4);
        }
    }

    #[test]
    fn test_sample_points_respects_cap() {
        let segment = StrokeSegment::line(pos2(0.0, 0.0), pos2(10_000.0, 0.0));
        assert_eq!(segment.sample_points(1.0, 64).len(), 65);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert!((distance_to_line_segment(pos2(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        assert!((distance_to_line_segment(pos2(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        assert!((distance_to_line_segment(pos2(3.0, 4.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounds() {
        let segment = StrokeSegment::line(pos2(10.0, 20.0), pos2(0.0, 5.0));
        let rect = segment.bounds(2.0);
        assert_eq!(rect.min, pos2(-2.0, 3.0));
        assert_eq!(rect.max, pos2(12.0, 22.0));
    }

    #[test]
    fn test_clipped_to_area() {
        let area = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0));
        let inside = StrokeSegment::line(pos2(1.0, 1.0), pos2(9.0, 2.0));
        assert_eq!(inside.clipped(area), Some(inside));

        let across = StrokeSegment::line(pos2(-1e30, 5.0), pos2(1e30, 5.0)).clipped(area).unwrap();
        assert_eq!(across.start(), pos2(0.0, 5.0));
        assert_eq!(across.point, pos2(10.0, 5.0));

        let outside = StrokeSegment::line(pos2(-5.0, -5.0), pos2(-1.0, 20.0));
        assert_eq!(outside.clipped(area), None);
        assert_eq!(StrokeSegment::dot(pos2(20.0, 1.0)).clipped(area), None);
    }
}

