//! Pure geometry: hit testing, previews, translation and arrowheads.
//!
//! Nothing here holds state; every function is deterministic in its inputs.

use crate::shapes::{Move, ShapeKind};
use kurbo::{Point, Rect, Vec2};
use std::f64::consts::FRAC_PI_6;

/// Max distance from a stroke for a point to count as a hit.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Absolute slack (in square units) for the triangle area test.
pub const TRIANGLE_AREA_TOLERANCE: f64 = 0.1;

/// Length of each arrowhead wing.
pub const ARROWHEAD_LENGTH: f64 = 10.0;

/// Tolerances used by [`hit_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTolerance {
    /// Distance to a line, arrow or path segment.
    pub stroke: f64,
    /// Slack when comparing sub-triangle areas.
    pub triangle_area: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            stroke: HIT_TOLERANCE,
            triangle_area: TRIANGLE_AREA_TOLERANCE,
        }
    }
}

/// Distance from a point to the segment `a -> b` (not the infinite line).
///
/// A zero-length segment is treated as the single point `a`.
pub fn distance_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Minimum distance from a point to a polyline.
///
/// Returns infinity for fewer than two points.
pub fn distance_point_to_polyline(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| distance_point_to_segment(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Unsigned area of the triangle `abc`.
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    ((b - a).cross(c - a) / 2.0).abs()
}

/// Hit test with the default tolerances.
pub fn point_in_shape(point: Point, m: &Move) -> bool {
    hit_test(point, m, &HitTolerance::default())
}

/// Check whether `point` lands on the move, dispatched by kind.
pub fn hit_test(point: Point, m: &Move, tolerance: &HitTolerance) -> bool {
    match m.kind() {
        ShapeKind::Rect => {
            let (a, b) = (m.first(), m.last());
            point.x >= a.x.min(b.x)
                && point.x <= a.x.max(b.x)
                && point.y >= a.y.min(b.y)
                && point.y <= a.y.max(b.y)
        }
        ShapeKind::Circle => {
            let center = m.first();
            point.distance(center) <= center.distance(m.last())
        }
        ShapeKind::Triangle => {
            let pts = m.points();
            let (a, b, c) = (pts[0], pts[1], pts[2]);
            let sum = triangle_area(point, b, c) + triangle_area(a, point, c) + triangle_area(a, b, point);
            (sum - triangle_area(a, b, c)).abs() <= tolerance.triangle_area
        }
        ShapeKind::Line | ShapeKind::Arrow => {
            distance_point_to_segment(point, m.first(), m.last()) <= tolerance.stroke
        }
        ShapeKind::Freehand | ShapeKind::Erase => {
            distance_point_to_polyline(point, m.points()) <= tolerance.stroke
        }
    }
}

/// Third triangle vertex: the current point mirrored across the anchor's x.
pub fn mirrored_vertex(anchor: Point, current: Point) -> Point {
    Point::new(anchor.x - (current.x - anchor.x), current.y)
}

/// The points a shape gesture would commit if it ended now.
pub fn shape_preview_points(kind: ShapeKind, anchor: Point, current: Point) -> Vec<Point> {
    match kind {
        ShapeKind::Triangle => vec![anchor, current, mirrored_vertex(anchor, current)],
        ShapeKind::Line
        | ShapeKind::Rect
        | ShapeKind::Circle
        | ShapeKind::Arrow
        | ShapeKind::Freehand
        | ShapeKind::Erase => vec![anchor, current],
    }
}

/// A new move with every point offset by `(dx, dy)`.
pub fn translate(m: &Move, dx: f64, dy: f64) -> Move {
    m.translated(dx, dy)
}

/// Wing endpoints of an arrowhead at `tip`, pointing away from `tail`.
///
/// Each wing is `length` long and sits 30 degrees off the reversed shaft
/// direction. Coincident `tip` and `tail` use an angle of zero.
pub fn arrowhead_wings(tip: Point, tail: Point, length: f64) -> (Point, Point) {
    let shaft = tip - tail;
    let angle = if shaft.hypot2() < f64::EPSILON {
        0.0
    } else {
        shaft.atan2()
    };
    let wing = |theta: f64| tip - Vec2::from_angle(theta) * length;
    (wing(angle - FRAC_PI_6), wing(angle + FRAC_PI_6))
}

/// Point the arrowhead is aimed from: the last point that differs from the tip.
///
/// Falls back to the tip itself when every point coincides with it.
pub fn arrow_tail(points: &[Point]) -> Point {
    let Some((&tip, rest)) = points.split_last() else {
        return Point::ORIGIN;
    };
    rest.iter().rev().copied().find(|&p| p != tip).unwrap_or(tip)
}

/// Axis-aligned bounds of a move as it is drawn (stroke width excluded).
pub fn move_bounds(m: &Move, arrowhead_length: f64) -> Rect {
    match m.kind() {
        ShapeKind::Circle => {
            let center = m.first();
            let r = center.distance(m.last());
            Rect::new(center.x - r, center.y - r, center.x + r, center.y + r)
        }
        ShapeKind::Rect => Rect::from_points(m.first(), m.last()),
        ShapeKind::Arrow => {
            let (left, right) = arrowhead_wings(m.last(), arrow_tail(m.points()), arrowhead_length);
            points_bounds(m.points()).union_pt(left).union_pt(right)
        }
        ShapeKind::Line | ShapeKind::Triangle | ShapeKind::Freehand | ShapeKind::Erase => {
            points_bounds(m.points())
        }
    }
}

fn points_bounds(points: &[Point]) -> Rect {
    let first = Rect::from_points(points[0], points[0]);
    points[1..].iter().fold(first, |r, p| r.union_pt(*p))
}
