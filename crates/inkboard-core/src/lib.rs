//! Inkboard Core Library
//!
//! Platform-agnostic whiteboard engine: the move model, hit-test geometry,
//! undo/redo history, the pointer state machine and the projection of moves
//! onto primitive paint operations.

pub mod canvas;
pub mod config;
pub mod document;
pub mod geometry;
pub mod history;
pub mod input;
pub mod paint;
pub mod shapes;
pub mod tools;

pub use canvas::Canvas;
pub use config::{BoardConfig, ConfigError};
pub use document::{Document, DocumentError};
pub use history::{History, HistoryError};
pub use input::PointerEvent;
pub use paint::{Compositing, PaintOp};
pub use shapes::{DrawOptions, Move, MoveError, MoveId, SerializableColor, ShapeKind};
pub use tools::{EditingMode, ToolManager, ToolResponse};

pub use kurbo::Point;
