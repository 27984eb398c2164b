//! Inkboard Render Library
//!
//! Drawing-surface abstraction for Inkboard paint operations, plus a
//! recording surface that turns them into kurbo paths with peniko brushes.

mod renderer;
mod scene;

pub use renderer::{Surface, compose_for, replay};
pub use scene::{SceneBrush, SceneItem, SceneRecorder};
