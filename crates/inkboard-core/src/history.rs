//! Linear undo/redo history of committed moves.

use crate::geometry::{HitTolerance, hit_test};
use crate::shapes::{Move, MoveId};
use kurbo::Point;
use thiserror::Error;

/// History errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("move index {index} out of range (history has {len} moves)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The committed moves in paint order plus a stack of undone moves.
///
/// `committed` order is z-order: later moves paint over earlier ones and
/// are hit-tested first. The redo buffer is only non-empty right after one
/// or more undos; any commit or replace clears it.
#[derive(Debug, Clone, Default)]
pub struct History {
    committed: Vec<Move>,
    redo_buffer: Vec<Move>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move on top of the z-order.
    pub fn commit(&mut self, m: Move) {
        log::debug!("commit {} {}", m.kind(), m.id());
        self.committed.push(m);
        self.redo_buffer.clear();
    }

    /// Undo the last commit.
    /// Returns the undone move, or `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Option<&Move> {
        let m = self.committed.pop()?;
        log::debug!("undo {} {}", m.kind(), m.id());
        self.redo_buffer.push(m);
        self.redo_buffer.last()
    }

    /// Re-apply the most recently undone move, on top of the z-order.
    pub fn redo(&mut self) -> Option<&Move> {
        let m = self.redo_buffer.pop()?;
        log::debug!("redo {} {}", m.kind(), m.id());
        self.committed.push(m);
        self.committed.last()
    }

    /// Swap the move at `index` for `m`, keeping its z-order slot.
    /// Returns the previous value.
    pub fn replace(&mut self, index: usize, m: Move) -> Result<Move, HistoryError> {
        let len = self.committed.len();
        let slot = self
            .committed
            .get_mut(index)
            .ok_or(HistoryError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(slot, m);
        self.redo_buffer.clear();
        Ok(previous)
    }

    /// Committed moves in paint order.
    pub fn snapshot(&self) -> &[Move] {
        &self.committed
    }

    pub fn get(&self, index: usize) -> Option<&Move> {
        self.committed.get(index)
    }

    /// Position of a committed move in z-order.
    pub fn index_of(&self, id: MoveId) -> Option<usize> {
        self.committed.iter().position(|m| m.id() == id)
    }

    /// Index of the topmost committed move under `point`.
    pub fn topmost_hit(&self, point: Point, tolerance: &HitTolerance) -> Option<usize> {
        self.committed
            .iter()
            .rposition(|m| hit_test(point, m, tolerance))
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Number of moves waiting to be redone.
    pub fn redo_len(&self) -> usize {
        self.redo_buffer.len()
    }

    /// Drop all committed and undone moves.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.redo_buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::translate;
    use crate::shapes::{DrawOptions, ShapeKind};

    fn mv(kind: ShapeKind, coords: &[(f64, f64)]) -> Move {
        let points = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Move::new(kind, points, DrawOptions::default()).unwrap()
    }

    fn ids(history: &History) -> Vec<MoveId> {
        history.snapshot().iter().map(Move::id).collect()
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::new();
        for i in 0..4 {
            let offset = i as f64 * 10.0;
            history.commit(mv(ShapeKind::Line, &[(offset, 0.0), (offset, 5.0)]));
        }
        let before = ids(&history);

        history.undo();
        history.redo();
        assert_eq!(ids(&history), before);

        history.undo();
        history.undo();
        history.redo();
        history.redo();
        assert_eq!(ids(&history), before);
    }

    #[test]
    fn test_undo_redo_empty() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_drops_both_stacks() {
        let mut history = History::new();
        history.commit(mv(ShapeKind::Line, &[(0.0, 0.0), (1.0, 1.0)]));
        history.commit(mv(ShapeKind::Rect, &[(0.0, 0.0), (1.0, 1.0)]));
        history.undo();

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.redo_len(), 0);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = History::new();
        history.commit(mv(ShapeKind::Line, &[(0.0, 0.0), (1.0, 1.0)]));
        history.undo();
        assert!(history.can_redo());

        history.commit(mv(ShapeKind::Rect, &[(0.0, 0.0), (1.0, 1.0)]));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_replace_clears_redo() {
        let mut history = History::new();
        history.commit(mv(ShapeKind::Rect, &[(0.0, 0.0), (10.0, 10.0)]));
        history.commit(mv(ShapeKind::Line, &[(0.0, 0.0), (1.0, 1.0)]));
        history.undo();
        assert_eq!(history.redo_len(), 1);

        let moved = translate(&history.snapshot()[0], 5.0, 5.0);
        history.replace(0, moved).unwrap();
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_replace_keeps_z_order() {
        let mut history = History::new();
        let a = mv(ShapeKind::Rect, &[(0.0, 0.0), (10.0, 10.0)]);
        let b = mv(ShapeKind::Circle, &[(0.0, 0.0), (3.0, 0.0)]);
        history.commit(a.clone());
        history.commit(b.clone());

        let previous = history.replace(0, translate(&a, 1.0, 1.0)).unwrap();
        assert_eq!(previous, a);
        assert_eq!(ids(&history), vec![a.id(), b.id()]);
        assert_eq!(history.snapshot()[0].first(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut history = History::new();
        let err = history
            .replace(3, mv(ShapeKind::Line, &[(0.0, 0.0), (1.0, 1.0)]))
            .unwrap_err();
        assert_eq!(err, HistoryError::IndexOutOfRange { index: 3, len: 0 });
        assert!(history.is_empty());
    }

    #[test]
    fn test_topmost_wins() {
        let mut history = History::new();
        let a = mv(ShapeKind::Rect, &[(0.0, 0.0), (100.0, 100.0)]);
        let b = mv(ShapeKind::Rect, &[(50.0, 50.0), (150.0, 150.0)]);
        history.commit(a);
        history.commit(b);

        let tolerance = HitTolerance::default();
        assert_eq!(history.topmost_hit(Point::new(75.0, 75.0), &tolerance), Some(1));
        assert_eq!(history.topmost_hit(Point::new(25.0, 25.0), &tolerance), Some(0));
        assert_eq!(history.topmost_hit(Point::new(500.0, 500.0), &tolerance), None);
    }

    #[test]
    fn test_rect_circle_scenario() {
        let mut history = History::new();
        history.commit(mv(ShapeKind::Rect, &[(0.0, 0.0), (10.0, 10.0)]));
        let circle = mv(ShapeKind::Circle, &[(5.0, 5.0), (5.0, 10.0)]);
        history.commit(circle.clone());

        history.undo();
        assert_eq!(history.len(), 1);
        assert_eq!(history.snapshot()[0].kind(), ShapeKind::Rect);

        history.redo();
        assert_eq!(history.len(), 2);
        assert_eq!(history.snapshot()[1], circle);
    }

    #[test]
    fn test_redo_restores_on_top() {
        let mut history = History::new();
        let a = mv(ShapeKind::Line, &[(0.0, 0.0), (1.0, 0.0)]);
        let b = mv(ShapeKind::Line, &[(0.0, 1.0), (1.0, 1.0)]);
        history.commit(a.clone());
        history.commit(b.clone());

        history.undo();
        history.undo();
        assert_eq!(history.redo().map(Move::id), Some(a.id()));
        assert_eq!(history.redo().map(Move::id), Some(b.id()));
        assert_eq!(ids(&history), vec![a.id(), b.id()]);
    }
}
