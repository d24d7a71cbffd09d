//! Linear undo/redo history of whole-document snapshots.

use serde::{Deserialize, Serialize};

/// Snapshots of canvas markup plus a cursor.
///
/// The cursor always points at the current snapshot. Pushing after an undo
/// discards every snapshot past the cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    states: Vec<String>,
    /// Index of the current snapshot; `None` while empty.
    current: Option<usize>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new snapshot after the current one.
    pub fn push(&mut self, snapshot: impl Into<String>) {
        let keep = self.current.map_or(0, |i| i + 1);
        self.states.truncate(keep);
        self.states.push(snapshot.into());
        self.current = Some(self.states.len() - 1);
        log::debug!("History push: {} of {}", keep + 1, self.states.len());
    }

    /// Step back one snapshot and return it.
    /// Returns None at the first snapshot.
    pub fn undo(&mut self) -> Option<&str> {
        let index = self.current.filter(|&i| i > 0)? - 1;
        self.current = Some(index);
        self.states.get(index).map(String::as_str)
    }

    /// Step forward one snapshot and return it.
    /// Returns None at the last snapshot.
    pub fn redo(&mut self) -> Option<&str> {
        let index = self.current.filter(|&i| i + 1 < self.states.len())? + 1;
        self.current = Some(index);
        self.states.get(index).map(String::as_str)
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.states.len())
    }

    /// The current snapshot.
    pub fn current(&self) -> Option<&str> {
        self.states.get(self.current?).map(String::as_str)
    }

    /// Index of the current snapshot.
    pub fn index(&self) -> Option<usize> {
        self.current
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.states.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), None);
    }

    #[test]
    fn test_undo_at_first_snapshot_is_noop() {
        let mut history = History::new();
        history.push("a");
        assert_eq!(history.undo(), None);
        assert!(!history.can_undo());
        assert_eq!(history.current(), Some("a"));
    }

    #[test]
    fn test_can_undo_redo_follow_index() {
        let mut history = History::new();
        for n in 0..4 {
            history.push(format!("s{n}"));
        }
        let total = history.len();
        loop {
            let index = history.index().unwrap();
            assert_eq!(history.can_undo(), index > 0);
            assert_eq!(history.can_redo(), index < total - 1);
            if history.undo().is_none() {
                break;
            }
        }
        assert_eq!(history.index(), Some(0));
        assert_eq!(history.redo(), Some("s1"));
        assert_eq!(history.redo(), Some("s2"));
        assert_eq!(history.redo(), Some("s3"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_after_undo_truncates() {
        let mut history = History::new();
        history.push("a");
        history.push("b");
        history.push("c");
        assert_eq!(history.undo(), Some("b"));

        history.push("d");
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some("b"));
        assert_eq!(history.undo(), Some("a"));
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.push("a");
        history.push("b");
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
    }
}
