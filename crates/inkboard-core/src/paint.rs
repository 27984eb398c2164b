//! Projection of moves onto primitive paint operations.
//!
//! The output is replayed from scratch against a cleared surface on every
//! repaint. Each move is wrapped in `Save`/`Restore` so its style and
//! compositing mode never leak into the next one.

use crate::geometry::{arrow_tail, arrowhead_wings};
use crate::shapes::{DrawOptions, Move, SerializableColor, ShapeKind};
use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

/// How new paint combines with the pixels already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compositing {
    /// Paint on top of existing content.
    #[default]
    SourceOver,
    /// Clear existing content where the new paint lands.
    DestinationOut,
}

impl Compositing {
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Erase => Compositing::DestinationOut,
            ShapeKind::Line
            | ShapeKind::Rect
            | ShapeKind::Circle
            | ShapeKind::Triangle
            | ShapeKind::Arrow
            | ShapeKind::Freehand => Compositing::SourceOver,
        }
    }
}

/// A primitive command for the external drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOp {
    /// Push the current style state.
    Save,
    /// Pop the style state pushed by the matching `Save`.
    Restore,
    SetLineWidth(f64),
    SetStrokeColor(SerializableColor),
    SetFillColor(SerializableColor),
    SetCompositing(Compositing),
    /// Start a new, empty path.
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc; angles in radians, clockwise in surface space.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    /// Closed rectangle subpath. `size` may be negative on either axis.
    Rect { origin: Point, size: Vec2 },
    ClosePath,
    Fill,
    Stroke,
}

/// Paint operations for every committed move followed by the live preview.
pub fn paint_operations(moves: &[Move], preview: Option<&Move>, arrowhead_length: f64) -> Vec<PaintOp> {
    let mut ops = Vec::new();
    for m in moves.iter().chain(preview) {
        push_move_operations(&mut ops, m, arrowhead_length);
    }
    ops
}

/// Paint operations for a single move.
pub fn move_operations(m: &Move, arrowhead_length: f64) -> Vec<PaintOp> {
    let mut ops = Vec::new();
    push_move_operations(&mut ops, m, arrowhead_length);
    ops
}

/// Paint operations for one segment of an in-progress freehand or erase path.
pub fn segment_operations(from: Point, to: Point, kind: ShapeKind, options: &DrawOptions) -> Vec<PaintOp> {
    let mut ops = Vec::with_capacity(10);
    push_style(&mut ops, kind, options);
    ops.extend([
        PaintOp::BeginPath,
        PaintOp::MoveTo(from),
        PaintOp::LineTo(to),
        PaintOp::Stroke,
        PaintOp::Restore,
    ]);
    ops
}

fn push_style(ops: &mut Vec<PaintOp>, kind: ShapeKind, options: &DrawOptions) {
    ops.extend([
        PaintOp::Save,
        PaintOp::SetLineWidth(options.line_width),
        PaintOp::SetStrokeColor(options.line_color),
        PaintOp::SetFillColor(options.fill_color),
        PaintOp::SetCompositing(Compositing::for_kind(kind)),
    ]);
}

fn push_polyline(ops: &mut Vec<PaintOp>, points: &[Point]) {
    ops.push(PaintOp::MoveTo(points[0]));
    ops.extend(points[1..].iter().map(|p| PaintOp::LineTo(*p)));
}

fn push_move_operations(ops: &mut Vec<PaintOp>, m: &Move, arrowhead_length: f64) {
    let kind = m.kind();
    let points = m.points();
    push_style(ops, kind, m.options());
    ops.push(PaintOp::BeginPath);

    match kind {
        ShapeKind::Line | ShapeKind::Freehand | ShapeKind::Erase => push_polyline(ops, points),
        ShapeKind::Arrow => {
            push_polyline(ops, points);
            let tip = m.last();
            let (left, right) = arrowhead_wings(tip, arrow_tail(points), arrowhead_length);
            ops.extend([
                PaintOp::MoveTo(tip),
                PaintOp::LineTo(left),
                PaintOp::MoveTo(tip),
                PaintOp::LineTo(right),
            ]);
        }
        ShapeKind::Circle => {
            let center = m.first();
            ops.push(PaintOp::Arc {
                center,
                radius: center.distance(m.last()),
                start_angle: 0.0,
                end_angle: TAU,
            });
        }
        ShapeKind::Rect => {
            let origin = m.first();
            ops.push(PaintOp::Rect {
                origin,
                size: m.last() - origin,
            });
        }
        ShapeKind::Triangle => {
            push_polyline(ops, points);
            ops.push(PaintOp::ClosePath);
        }
    }

    if kind.is_filled() {
        ops.push(PaintOp::Fill);
    }
    ops.push(PaintOp::Stroke);
    ops.push(PaintOp::Restore);
}
