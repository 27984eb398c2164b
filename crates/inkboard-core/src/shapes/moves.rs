//! The move: one committed drawing action.

use super::{DrawOptions, PointCount, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for moves.
pub type MoveId = Uuid;

/// Errors raised when a move would violate its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveError {
    #[error("{kind} needs {expected} points, got {actual}")]
    PointCount {
        kind: ShapeKind,
        expected: PointCount,
        actual: usize,
    },
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
    #[error("line width must be finite and positive, got {0}")]
    InvalidLineWidth(f64),
}

/// An immutable drawing action.
///
/// Fields are private so a committed move can only change by being replaced
/// with a new value (see [`Move::translated`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MoveRecord")]
pub struct Move {
    id: MoveId,
    kind: ShapeKind,
    points: Vec<Point>,
    options: DrawOptions,
    created_at: u64,
}

/// Unvalidated wire form of a [`Move`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: MoveId,
    pub kind: ShapeKind,
    pub points: Vec<Point>,
    #[serde(default)]
    pub options: DrawOptions,
    #[serde(default)]
    pub created_at: u64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn validate(kind: ShapeKind, points: &[Point], options: &DrawOptions) -> Result<(), MoveError> {
    let expected = kind.point_count();
    if !expected.accepts(points.len()) {
        return Err(MoveError::PointCount {
            kind,
            expected,
            actual: points.len(),
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(MoveError::NonFinitePoint { index });
    }
    if !(options.line_width.is_finite() && options.line_width > 0.0) {
        return Err(MoveError::InvalidLineWidth(options.line_width));
    }
    Ok(())
}

impl Move {
    /// Create a move with a fresh id.
    pub fn new(kind: ShapeKind, points: Vec<Point>, options: DrawOptions) -> Result<Self, MoveError> {
        validate(kind, &points, &options)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            points,
            options,
            created_at: now_millis(),
        })
    }

    pub fn id(&self) -> MoveId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    /// Creation time in milliseconds since the UNIX epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Anchor point: the start of a line, a rect corner, a circle's center.
    pub fn first(&self) -> Point {
        self.points[0]
    }

    /// Far point: line end, opposite rect corner, circle edge.
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// A copy of this move with every point offset by `(dx, dy)`.
    ///
    /// The id, kind, options and timestamp are carried over.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
            ..self.clone()
        }
    }
}

impl TryFrom<MoveRecord> for Move {
    type Error = MoveError;

    fn try_from(record: MoveRecord) -> Result<Self, Self::Error> {
        validate(record.kind, &record.points, &record.options)?;
        Ok(Self {
            id: record.id,
            kind: record.kind,
            points: record.points,
            options: record.options,
            created_at: record.created_at,
        })
    }
}
