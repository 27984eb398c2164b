//! Canvas: the whiteboard engine as seen by a UI layer.

use crate::config::{BoardConfig, ConfigError};
use crate::document::{Document, DocumentError};
use crate::geometry::move_bounds;
use crate::history::History;
use crate::input::PointerEvent;
use crate::paint::{PaintOp, paint_operations};
use crate::shapes::{DrawOptions, Move, MoveError, ShapeKind};
use crate::tools::{EditingMode, ToolManager, ToolResponse};
use kurbo::{Point, Rect};

/// A single whiteboard document with its edit history and active gesture.
///
/// UI adapters forward pointer events to the `on_pointer_*` methods and
/// replay [`Canvas::paint_operations`] on every repaint.
#[derive(Debug, Clone)]
pub struct Canvas {
    history: History,
    tools: ToolManager,
    config: BoardConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with the default config.
    pub fn new() -> Self {
        Self::from_config(BoardConfig::default())
    }

    /// Create an empty canvas with a validated config.
    pub fn with_config(config: BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: BoardConfig) -> Self {
        let mut tools = ToolManager::new().with_tolerance(config.hit_tolerances());
        tools.set_kind(config.default_kind);
        tools.set_mode(config.default_mode);
        if let Err(err) = tools.set_options(config.default_options) {
            log::warn!("ignoring default draw options: {err}");
        }
        Self {
            history: History::new(),
            tools,
            config,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Committed moves in paint order.
    pub fn moves(&self) -> &[Move] {
        self.history.snapshot()
    }

    pub fn on_pointer_down(&mut self, point: Point) -> ToolResponse {
        self.tools.pointer_down(point, &self.history)
    }

    pub fn on_pointer_move(&mut self, point: Point) -> ToolResponse {
        self.tools.pointer_move(point, &mut self.history)
    }

    pub fn on_pointer_up(&mut self, point: Point) -> ToolResponse {
        self.tools.pointer_up(point, &mut self.history)
    }

    pub fn on_pointer_leave(&mut self, point: Point) -> ToolResponse {
        self.tools.pointer_leave(point, &mut self.history)
    }

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> ToolResponse {
        match event {
            PointerEvent::Down { position } => self.on_pointer_down(position),
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Up { position } => self.on_pointer_up(position),
            PointerEvent::Leave { position } => self.on_pointer_leave(position),
        }
    }

    pub fn set_active_kind(&mut self, kind: ShapeKind) {
        self.tools.set_kind(kind);
    }

    pub fn set_editing_mode(&mut self, mode: EditingMode) {
        self.tools.set_mode(mode);
    }

    pub fn set_draw_options(&mut self, options: DrawOptions) -> Result<(), MoveError> {
        self.tools.set_options(options)
    }

    pub fn active_kind(&self) -> ShapeKind {
        self.tools.active_kind()
    }

    pub fn editing_mode(&self) -> EditingMode {
        self.tools.mode()
    }

    pub fn draw_options(&self) -> &DrawOptions {
        self.tools.options()
    }

    /// Check if a gesture is in progress.
    pub fn is_interacting(&self) -> bool {
        self.tools.is_active()
    }

    /// Undo the last commit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    /// Redo the last undo. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The in-progress shape, if a creating gesture is active.
    pub fn preview(&self) -> Option<Move> {
        self.tools.preview()
    }

    /// Full paint list: committed moves, then the live preview.
    pub fn paint_operations(&self) -> Vec<PaintOp> {
        let preview = self.tools.preview();
        paint_operations(self.moves(), preview.as_ref(), self.config.arrowhead_length)
    }

    /// Index of the topmost move under `point`.
    pub fn move_at(&self, point: Point) -> Option<usize> {
        self.history.topmost_hit(point, &self.config.hit_tolerances())
    }

    /// Bounding box of all committed moves.
    pub fn bounds(&self) -> Option<Rect> {
        self.moves()
            .iter()
            .map(|m| move_bounds(m, self.config.arrowhead_length))
            .reduce(|a, b| a.union(b))
    }

    /// Serialize the committed moves.
    pub fn export_json(&self) -> Result<String, DocumentError> {
        Document::new(self.moves().to_vec()).to_json()
    }

    /// Replace the committed moves with a parsed document.
    ///
    /// Clears the redo buffer and ends any gesture. On error the canvas is
    /// left untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = Document::from_json(json).inspect_err(|err| {
            log::warn!("document import rejected: {err}");
        })?;
        log::debug!("imported {} moves", document.moves.len());
        self.history.clear();
        for m in document.moves {
            self.history.commit(m);
        }
        self.tools.reset();
        Ok(())
    }
}
