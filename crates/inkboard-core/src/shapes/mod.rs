//! Shape definitions for the whiteboard.

mod moves;

pub use moves::{Move, MoveError, MoveId, MoveRecord};

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// White with zero alpha, the default fill of new shapes.
    pub const fn transparent() -> Self {
        Self::new(255, 255, 255, 0)
    }

    /// True when the color paints nothing.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint styling for a move. Copied by value into each move at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawOptions {
    /// Stroke width in surface units. Must be finite and positive.
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Stroke color.
    #[serde(default = "SerializableColor::black")]
    pub line_color: SerializableColor,
    /// Fill color for closed shapes.
    #[serde(default = "SerializableColor::transparent")]
    pub fill_color: SerializableColor,
    /// Brush size selected in the UI.
    #[serde(default = "default_size")]
    pub size: f64,
}

fn default_line_width() -> f64 {
    2.0
}

fn default_size() -> f64 {
    5.0
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            line_color: SerializableColor::black(),
            fill_color: SerializableColor::transparent(),
            size: default_size(),
        }
    }
}

impl DrawOptions {
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_line_color(mut self, color: SerializableColor) -> Self {
        self.line_color = color;
        self
    }

    pub fn with_fill_color(mut self, color: SerializableColor) -> Self {
        self.fill_color = color;
        self
    }
}

/// The kind of a drawn move.
///
/// `Erase` is a kind of its own rather than a style flag: it composites
/// destructively where every other kind paints on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Line,
    Rect,
    Circle,
    Triangle,
    Arrow,
    Freehand,
    Erase,
}

/// Point-count requirement for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCount {
    AtLeast(usize),
    Exactly(usize),
}

impl PointCount {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            PointCount::AtLeast(n) => count >= n,
            PointCount::Exactly(n) => count == n,
        }
    }
}

impl fmt::Display for PointCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointCount::AtLeast(n) => write!(f, "at least {n}"),
            PointCount::Exactly(n) => write!(f, "exactly {n}"),
        }
    }
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Line,
        ShapeKind::Rect,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Arrow,
        ShapeKind::Freehand,
        ShapeKind::Erase,
    ];

    /// How many points a move of this kind must carry.
    pub fn point_count(self) -> PointCount {
        match self {
            ShapeKind::Triangle => PointCount::Exactly(3),
            ShapeKind::Line
            | ShapeKind::Rect
            | ShapeKind::Circle
            | ShapeKind::Arrow
            | ShapeKind::Freehand
            | ShapeKind::Erase => PointCount::AtLeast(2),
        }
    }

    /// Closed shapes are filled before they are stroked.
    pub fn is_filled(self) -> bool {
        match self {
            ShapeKind::Rect | ShapeKind::Circle | ShapeKind::Triangle => true,
            ShapeKind::Line | ShapeKind::Arrow | ShapeKind::Freehand | ShapeKind::Erase => false,
        }
    }

    /// Kinds built from an accumulated pointer path rather than two anchors.
    pub fn is_path(self) -> bool {
        matches!(self, ShapeKind::Freehand | ShapeKind::Erase)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Freehand => "freehand",
            ShapeKind::Erase => "erase",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
