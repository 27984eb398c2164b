//! Tool system: turns a pointer-event stream into edits.

use crate::geometry::{HitTolerance, shape_preview_points, translate};
use crate::history::History;
use crate::paint::{PaintOp, segment_operations};
use crate::shapes::{DrawOptions, Move, MoveError, MoveId, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a creating gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditingMode {
    /// A discrete primitive of the active [`ShapeKind`].
    #[default]
    Shape,
    /// A freehand stroke through every pointer sample.
    Freehand,
    /// An erase stroke. Never starts a drag.
    Erase,
}

impl EditingMode {
    /// The kind committed by a gesture in this mode.
    pub fn gesture_kind(self, active_kind: ShapeKind) -> ShapeKind {
        match self {
            EditingMode::Shape => active_kind,
            EditingMode::Freehand => ShapeKind::Freehand,
            EditingMode::Erase => ShapeKind::Erase,
        }
    }
}

/// State of the current gesture.
#[derive(Debug, Clone, Default)]
enum InteractionState {
    #[default]
    Idle,
    /// Building a new move.
    Creating {
        kind: ShapeKind,
        options: DrawOptions,
        anchor: Point,
        current: Point,
        /// Every sample so far, for freehand and erase strokes.
        path: Vec<Point>,
    },
    /// Dragging a committed move.
    Dragging {
        index: usize,
        id: MoveId,
        last_point: Point,
    },
}

/// Result of feeding one pointer event to the [`ToolManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    /// The event means nothing in the current state.
    Ignored,
    /// A creating gesture began.
    Started,
    /// A drag began on the move at this z-order index.
    DragStarted { index: usize },
    /// The preview shape changed.
    Preview,
    /// A freehand/erase path grew; paint just the newest segment.
    Segment(Vec<PaintOp>),
    /// The dragged move was translated.
    Dragged { index: usize },
    /// The drag ended. Nothing was committed.
    DragFinished { index: usize },
    /// A new move was committed.
    Committed { id: MoveId },
    /// The gesture ended without producing a move.
    Discarded,
}

/// Manages the active tool selection and the state of the current gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    active_kind: ShapeKind,
    mode: EditingMode,
    options: DrawOptions,
    tolerance: HitTolerance,
    state: InteractionState,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: HitTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn active_kind(&self) -> ShapeKind {
        self.active_kind
    }

    pub fn mode(&self) -> EditingMode {
        self.mode
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    /// Select the shape drawn in shape mode. An in-flight gesture keeps its kind.
    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.active_kind = kind;
    }

    /// Select the editing mode. An in-flight gesture keeps its mode.
    pub fn set_mode(&mut self, mode: EditingMode) {
        self.mode = mode;
    }

    /// Set the style for subsequent moves.
    pub fn set_options(&mut self, options: DrawOptions) -> Result<(), MoveError> {
        if !(options.line_width.is_finite() && options.line_width > 0.0) {
            return Err(MoveError::InvalidLineWidth(options.line_width));
        }
        self.options = options;
        Ok(())
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    /// Drop the current gesture without committing anything.
    pub(crate) fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    fn gesture_kind(&self) -> ShapeKind {
        self.mode.gesture_kind(self.active_kind)
    }

    /// Pointer pressed: start a drag on the topmost hit, or a new move.
    pub fn pointer_down(&mut self, point: Point, history: &History) -> ToolResponse {
        if self.is_active() {
            log::trace!("pointer down during an active gesture ignored");
            return ToolResponse::Ignored;
        }
        if !point.is_finite() {
            log::warn!("non-finite pointer down ignored");
            return ToolResponse::Ignored;
        }

        if self.mode != EditingMode::Erase {
            if let Some(index) = history.topmost_hit(point, &self.tolerance) {
                let id = history.snapshot()[index].id();
                log::debug!("drag start on move {id} at index {index}");
                self.state = InteractionState::Dragging {
                    index,
                    id,
                    last_point: point,
                };
                return ToolResponse::DragStarted { index };
            }
        }

        let kind = self.gesture_kind();
        log::debug!("create {kind} at ({}, {})", point.x, point.y);
        self.state = InteractionState::Creating {
            kind,
            options: self.options,
            anchor: point,
            current: point,
            path: if kind.is_path() { vec![point] } else { Vec::new() },
        };
        ToolResponse::Started
    }

    /// Pointer moved: grow the preview or translate the dragged move.
    ///
    /// Non-finite samples are dropped and leave the gesture untouched.
    pub fn pointer_move(&mut self, point: Point, history: &mut History) -> ToolResponse {
        if !point.is_finite() {
            log::warn!("non-finite pointer move ignored");
            return ToolResponse::Ignored;
        }
        match &mut self.state {
            InteractionState::Idle => ToolResponse::Ignored,
            InteractionState::Creating {
                kind,
                options,
                current,
                path,
                ..
            } => {
                *current = point;
                if !kind.is_path() {
                    return ToolResponse::Preview;
                }
                let from = path.last().copied().unwrap_or(point);
                path.push(point);
                ToolResponse::Segment(segment_operations(from, point, *kind, options))
            }
            InteractionState::Dragging {
                index,
                id,
                last_point,
            } => {
                // The history may have shifted under us (undo mid-drag); follow the id.
                if history.get(*index).map(Move::id) != Some(*id) {
                    match history.index_of(*id) {
                        Some(found) => *index = found,
                        None => {
                            log::debug!("dragged move {id} no longer committed, ending drag");
                            self.state = InteractionState::Idle;
                            return ToolResponse::Ignored;
                        }
                    }
                }
                let (dx, dy) = (point.x - last_point.x, point.y - last_point.y);
                let moved = translate(&history.snapshot()[*index], dx, dy);
                if let Err(err) = history.replace(*index, moved) {
                    log::warn!("drag replace failed: {err}");
                    self.state = InteractionState::Idle;
                    return ToolResponse::Ignored;
                }
                log::trace!("drag {id} by ({dx}, {dy})");
                *last_point = point;
                ToolResponse::Dragged { index: *index }
            }
        }
    }

    /// Pointer released: commit the new move, or end the drag.
    ///
    /// The release position is not sampled; the gesture ends where the last
    /// move event left it.
    pub fn pointer_up(&mut self, _point: Point, history: &mut History) -> ToolResponse {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => ToolResponse::Ignored,
            InteractionState::Dragging { index, id, .. } => {
                log::debug!("drag end on move {id}");
                ToolResponse::DragFinished { index }
            }
            InteractionState::Creating {
                kind,
                options,
                anchor,
                current,
                path,
            } => {
                let points = if kind.is_path() {
                    if path.len() < 2 {
                        log::debug!("{kind} tap discarded");
                        return ToolResponse::Discarded;
                    }
                    path
                } else {
                    shape_preview_points(kind, anchor, current)
                };
                match Move::new(kind, points, options) {
                    Ok(m) => {
                        let id = m.id();
                        history.commit(m);
                        ToolResponse::Committed { id }
                    }
                    Err(err) => {
                        log::warn!("gesture produced an invalid {kind}: {err}");
                        ToolResponse::Discarded
                    }
                }
            }
        }
    }

    /// Pointer left the surface. Finalizes exactly like a release.
    pub fn pointer_leave(&mut self, point: Point, history: &mut History) -> ToolResponse {
        self.pointer_up(point, history)
    }

    /// The move the current creating gesture would commit right now.
    pub fn preview(&self) -> Option<Move> {
        match &self.state {
            InteractionState::Creating {
                kind,
                options,
                anchor,
                current,
                path,
            } => {
                let points = if kind.is_path() {
                    path.clone()
                } else {
                    shape_preview_points(*kind, *anchor, *current)
                };
                Move::new(*kind, points, *options).ok()
            }
            InteractionState::Idle | InteractionState::Dragging { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Compositing;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn shape_tool(kind: ShapeKind) -> ToolManager {
        let mut tm = ToolManager::new();
        tm.set_kind(kind);
        tm
    }

    #[test]
    fn test_shape_gesture_commits() {
        let mut history = History::new();
        let mut tm = shape_tool(ShapeKind::Rect);

        assert_eq!(tm.pointer_down(p(0.0, 0.0), &history), ToolResponse::Started);
        assert!(tm.is_active());
        assert_eq!(tm.pointer_move(p(20.0, 30.0), &mut history), ToolResponse::Preview);
        assert!(matches!(
            tm.pointer_up(p(20.0, 30.0), &mut history),
            ToolResponse::Committed { .. }
        ));

        assert!(!tm.is_active());
        let m = &history.snapshot()[0];
        assert_eq!(m.kind(), ShapeKind::Rect);
        assert_eq!(m.points(), &[p(0.0, 0.0), p(20.0, 30.0)]);
    }

    #[test]
    fn test_triangle_gesture() {
        let mut history = History::new();
        let mut tm = shape_tool(ShapeKind::Triangle);
        tm.pointer_down(p(100.0, 100.0), &history);
        tm.pointer_move(p(150.0, 160.0), &mut history);
        tm.pointer_up(p(150.0, 160.0), &mut history);

        assert_eq!(
            history.snapshot()[0].points(),
            &[p(100.0, 100.0), p(150.0, 160.0), p(50.0, 160.0)]
        );
    }

    #[test]
    fn test_freehand_tap_commits_nothing() {
        let mut history = History::new();
        let mut tm = ToolManager::new();
        tm.set_mode(EditingMode::Freehand);

        tm.pointer_down(p(5.0, 5.0), &history);
        assert_eq!(tm.pointer_up(p(5.0, 5.0), &mut history), ToolResponse::Discarded);
        assert!(history.is_empty());
        assert!(!tm.is_active());
    }

    #[test]
    fn test_freehand_keeps_every_sample() {
        let mut history = History::new();
        let mut tm = ToolManager::new();
        tm.set_mode(EditingMode::Freehand);

        tm.pointer_down(p(0.0, 0.0), &history);
        let samples = [p(0.1, 0.0), p(0.1, 0.0), p(5.0, 5.0)];
        for s in samples {
            assert!(matches!(tm.pointer_move(s, &mut history), ToolResponse::Segment(_)));
        }
        tm.pointer_up(p(5.0, 5.0), &mut history);

        let m = &history.snapshot()[0];
        assert_eq!(m.kind(), ShapeKind::Freehand);
        assert_eq!(m.points().len(), 4);
    }

    #[test]
    fn test_segment_is_newest_only() {
        let mut history = History::new();
        let mut tm = ToolManager::new();
        tm.set_mode(EditingMode::Erase);

        tm.pointer_down(p(0.0, 0.0), &history);
        tm.pointer_move(p(1.0, 0.0), &mut history);
        let ToolResponse::Segment(ops) = tm.pointer_move(p(2.0, 0.0), &mut history) else {
            panic!("expected a segment");
        };
        assert!(ops.contains(&PaintOp::MoveTo(p(1.0, 0.0))));
        assert!(ops.contains(&PaintOp::LineTo(p(2.0, 0.0))));
        assert!(ops.contains(&PaintOp::SetCompositing(Compositing::DestinationOut)));
    }

    #[test]
    fn test_erase_never_drags() {
        let mut history = History::new();
        history.commit(
            Move::new(ShapeKind::Rect, vec![p(0.0, 0.0), p(100.0, 100.0)], DrawOptions::default()).unwrap(),
        );
        let mut tm = ToolManager::new();
        tm.set_mode(EditingMode::Erase);

        assert_eq!(tm.pointer_down(p(50.0, 50.0), &history), ToolResponse::Started);
        tm.pointer_move(p(60.0, 60.0), &mut history);
        tm.pointer_up(p(60.0, 60.0), &mut history);

        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshot()[0].first(), p(0.0, 0.0));
        assert_eq!(history.snapshot()[1].kind(), ShapeKind::Erase);
    }

    #[test]
    fn test_drag_translates_without_commit() {
        let mut history = History::new();
        let rect = Move::new(ShapeKind::Rect, vec![p(0.0, 0.0), p(10.0, 10.0)], DrawOptions::default()).unwrap();
        let id = rect.id();
        history.commit(rect);
        let mut tm = shape_tool(ShapeKind::Line);

        assert_eq!(tm.pointer_down(p(5.0, 5.0), &history), ToolResponse::DragStarted { index: 0 });
        assert!(tm.is_dragging());
        assert_eq!(tm.pointer_move(p(8.0, 9.0), &mut history), ToolResponse::Dragged { index: 0 });
        tm.pointer_move(p(10.0, 10.0), &mut history);
        assert_eq!(tm.pointer_up(p(10.0, 10.0), &mut history), ToolResponse::DragFinished { index: 0 });

        assert_eq!(history.len(), 1);
        let m = &history.snapshot()[0];
        assert_eq!(m.id(), id);
        assert_eq!(m.points(), &[p(5.0, 5.0), p(15.0, 15.0)]);
    }

    #[test]
    fn test_drag_picks_topmost() {
        let mut history = History::new();
        for origin in [0.0, 50.0] {
            history.commit(
                Move::new(
                    ShapeKind::Rect,
                    vec![p(origin, origin), p(origin + 100.0, origin + 100.0)],
                    DrawOptions::default(),
                )
                .unwrap(),
            );
        }
        let mut tm = ToolManager::new();
        assert_eq!(tm.pointer_down(p(75.0, 75.0), &history), ToolResponse::DragStarted { index: 1 });
    }

    #[test]
    fn test_drag_follows_undo() {
        let mut history = History::new();
        let rect = Move::new(ShapeKind::Rect, vec![p(0.0, 0.0), p(10.0, 10.0)], DrawOptions::default()).unwrap();
        history.commit(rect);
        let mut tm = ToolManager::new();
        tm.pointer_down(p(5.0, 5.0), &history);

        history.undo();
        assert_eq!(tm.pointer_move(p(6.0, 6.0), &mut history), ToolResponse::Ignored);
        assert!(!tm.is_active());
        assert!(history.is_empty());
    }

    #[test]
    fn test_leave_finalizes() {
        let mut history = History::new();
        let mut tm = shape_tool(ShapeKind::Line);
        tm.pointer_down(p(0.0, 0.0), &history);
        tm.pointer_move(p(40.0, 0.0), &mut history);

        assert!(matches!(
            tm.pointer_leave(p(45.0, 0.0), &mut history),
            ToolResponse::Committed { .. }
        ));
        assert_eq!(history.snapshot()[0].last(), p(40.0, 0.0));
        assert!(!tm.is_active());
    }

    #[test]
    fn test_leave_ends_drag_without_commit() {
        let mut history = History::new();
        history.commit(
            Move::new(ShapeKind::Rect, vec![p(0.0, 0.0), p(10.0, 10.0)], DrawOptions::default()).unwrap(),
        );
        let mut tm = ToolManager::new();
        tm.pointer_down(p(5.0, 5.0), &history);
        tm.pointer_move(p(7.0, 5.0), &mut history);

        assert_eq!(
            tm.pointer_leave(p(9.0, 5.0), &mut history),
            ToolResponse::DragFinished { index: 0 }
        );
        assert!(!tm.is_active());
        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
        assert_eq!(history.snapshot()[0].points(), &[p(2.0, 0.0), p(12.0, 10.0)]);
    }

    #[test]
    fn test_erase_tap_commits_nothing() {
        let mut history = History::new();
        let mut tm = ToolManager::new();
        tm.set_mode(EditingMode::Erase);

        assert_eq!(tm.pointer_down(p(5.0, 5.0), &history), ToolResponse::Started);
        assert_eq!(tm.pointer_up(p(5.0, 5.0), &mut history), ToolResponse::Discarded);
        assert!(history.is_empty());
        assert!(!tm.is_active());
    }

    #[test]
    fn test_non_finite_drag_sample_ignored() {
        let mut history = History::new();
        history.commit(
            Move::new(ShapeKind::Rect, vec![p(0.0, 0.0), p(10.0, 10.0)], DrawOptions::default()).unwrap(),
        );
        let mut tm = ToolManager::new();
        tm.pointer_down(p(5.0, 5.0), &history);

        assert_eq!(tm.pointer_move(p(f64::NAN, 5.0), &mut history), ToolResponse::Ignored);
        assert_eq!(tm.pointer_move(p(5.0, f64::INFINITY), &mut history), ToolResponse::Ignored);
        assert!(tm.is_dragging());
        assert_eq!(history.snapshot()[0].points(), &[p(0.0, 0.0), p(10.0, 10.0)]);

        // the drag continues from the last finite sample
        tm.pointer_move(p(8.0, 5.0), &mut history);
        tm.pointer_up(p(8.0, 5.0), &mut history);
        assert_eq!(history.snapshot()[0].points(), &[p(3.0, 0.0), p(13.0, 10.0)]);
    }

    #[test]
    fn test_non_finite_samples_never_reach_a_move() {
        let mut history = History::new();
        let mut tm = ToolManager::new();
        assert_eq!(tm.pointer_down(p(f64::NAN, 0.0), &history), ToolResponse::Ignored);
        assert!(!tm.is_active());

        tm.set_mode(EditingMode::Freehand);
        tm.pointer_down(p(0.0, 0.0), &history);
        tm.pointer_move(p(f64::NEG_INFINITY, 1.0), &mut history);
        tm.pointer_move(p(4.0, 4.0), &mut history);
        tm.pointer_up(p(4.0, 4.0), &mut history);
        assert_eq!(history.snapshot()[0].points(), &[p(0.0, 0.0), p(4.0, 4.0)]);
    }

    #[test]
    fn test_selection_changes_apply_to_next_gesture() {
        let mut history = History::new();
        let mut tm = shape_tool(ShapeKind::Circle);
        tm.pointer_down(p(0.0, 0.0), &history);
        tm.set_kind(ShapeKind::Line);
        tm.set_options(DrawOptions::default().with_line_width(9.0)).unwrap();
        tm.pointer_move(p(3.0, 4.0), &mut history);
        tm.pointer_up(p(3.0, 4.0), &mut history);

        let m = &history.snapshot()[0];
        assert_eq!(m.kind(), ShapeKind::Circle);
        assert_eq!(m.options().line_width, 2.0);
        assert_eq!(tm.options().line_width, 9.0);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let mut tm = ToolManager::new();
        let err = tm.set_options(DrawOptions::default().with_line_width(-1.0));
        assert_eq!(err, Err(MoveError::InvalidLineWidth(-1.0)));
        assert_eq!(tm.options().line_width, 2.0);
    }

    #[test]
    fn test_idle_events_ignored() {
        let mut history = History::new();
        let mut tm = ToolManager::new();
        assert_eq!(tm.pointer_move(p(1.0, 1.0), &mut history), ToolResponse::Ignored);
        assert_eq!(tm.pointer_up(p(1.0, 1.0), &mut history), ToolResponse::Ignored);
        assert_eq!(tm.pointer_leave(p(1.0, 1.0), &mut history), ToolResponse::Ignored);

        tm.pointer_down(p(0.0, 0.0), &history);
        assert_eq!(tm.pointer_down(p(9.0, 9.0), &history), ToolResponse::Ignored);
    }

    #[test]
    fn test_preview() {
        let mut history = History::new();
        let mut tm = shape_tool(ShapeKind::Arrow);
        assert!(tm.preview().is_none());

        tm.pointer_down(p(0.0, 0.0), &history);
        tm.pointer_move(p(10.0, 0.0), &mut history);
        let preview = tm.preview().unwrap();
        assert_eq!(preview.kind(), ShapeKind::Arrow);
        assert_eq!(preview.points(), &[p(0.0, 0.0), p(10.0, 0.0)]);
        assert!(history.is_empty());

        tm.set_mode(EditingMode::Freehand);
        tm.pointer_up(p(10.0, 0.0), &mut history);
        tm.pointer_down(p(100.0, 100.0), &history);
        // a single sample is not a drawable stroke yet
        assert!(tm.preview().is_none());
    }
}
