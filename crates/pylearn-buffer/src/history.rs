//! Undo/redo history.
//!
//! ## The Command Pattern
//!
//! Each edit is stored as a value that can be reversed. Edits are kept in
//! groups; one group is one undo step. A replace (delete + insert) or a
//! surface sync is recorded as a single group, and rapid single-character
//! typing is coalesced into the previous group.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single edit operation, in char offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Character position where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Number of characters this edit touches.
    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns the inverse of this edit.
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Returns true if `other` continues this edit (typing or backspacing
    /// through a run of characters on one line).
    pub fn can_coalesce(&self, other: &Edit) -> bool {
        if self.kind != other.kind {
            return false;
        }

        if self.content.contains('\n') || other.content.contains('\n') {
            return false;
        }

        match self.kind {
            EditKind::Insert => self.position + self.len_chars() == other.position,
            EditKind::Delete => {
                other.position + other.len_chars() == self.position
                    || self.position == other.position
            }
        }
    }

    /// Coalesces another edit into this one.
    pub fn coalesce(&mut self, other: Edit) {
        match self.kind {
            EditKind::Insert => {
                self.content.push_str(&other.content);
            }
            EditKind::Delete => {
                if other.position < self.position {
                    // Backspace
                    self.content = other.content + &self.content;
                    self.position = other.position;
                } else {
                    // Forward delete
                    self.content.push_str(&other.content);
                }
            }
        }
    }
}

/// A group of edits undone and redone together.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// Edits in the order they were applied
    pub edits: Vec<Edit>,
    /// When this group last grew; `None` blocks coalescing
    timestamp: Option<Instant>,
}

impl EditGroup {
    fn new(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            timestamp: Some(Instant::now()),
        }
    }

    /// Char offset where the cursor belongs after this group is undone.
    pub fn undo_cursor(&self) -> usize {
        self.edits.first().map(|e| e.position).unwrap_or(0)
    }

    /// Char offset where the cursor belongs after this group is redone.
    pub fn redo_cursor(&self) -> usize {
        self.edits
            .last()
            .map(|e| match e.kind {
                EditKind::Insert => e.position + e.len_chars(),
                EditKind::Delete => e.position,
            })
            .unwrap_or(0)
    }
}

/// Bounded undo/redo stacks.
///
/// `VecDeque` for the undo side: new groups go to the back, the oldest fall
/// off the front once `max_size` is reached.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<EditGroup>,
    redo_stack: Vec<EditGroup>,
    max_size: usize,
    coalesce_threshold: Duration,
    in_group: bool,
    group_pending: bool,
}

impl History {
    /// Creates a new history with the given capacity (in undo steps).
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(1024)),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            coalesce_threshold: Duration::from_millis(300),
            in_group: false,
            group_pending: false,
        }
    }

    /// Sets how close in time two keystrokes must be to share an undo step.
    /// `Duration::ZERO` turns coalescing off.
    pub fn with_coalesce_threshold(mut self, threshold: Duration) -> Self {
        self.coalesce_threshold = threshold;
        self
    }

    /// Records an edit. Clears the redo stack.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if self.in_group {
            if self.group_pending {
                self.group_pending = false;
            } else if let Some(group) = self.undo_stack.back_mut() {
                group.edits.push(edit);
                return;
            }
        } else if let Some(group) = self.undo_stack.back_mut() {
            let recent = group
                .timestamp
                .is_some_and(|t| t.elapsed() < self.coalesce_threshold);
            if recent && group.edits.len() == 1 {
                if let Some(last) = group.edits.last_mut() {
                    if last.can_coalesce(&edit) {
                        last.coalesce(edit);
                        group.timestamp = Some(Instant::now());
                        return;
                    }
                }
            }
        }

        let mut group = EditGroup::new(edit);
        if self.in_group {
            // Compound groups never absorb later keystrokes
            group.timestamp = None;
        }
        self.undo_stack.push_back(group);

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Starts a compound step; every edit until `end_group()` is one undo step.
    pub fn begin_group(&mut self) {
        self.in_group = true;
        self.group_pending = true;
    }

    /// Ends the current compound step.
    pub fn end_group(&mut self) {
        self.in_group = false;
        self.group_pending = false;
    }

    /// Pops the newest group for undo. The caller reverses its edits
    /// last-to-first.
    pub fn undo(&mut self) -> Option<EditGroup> {
        let mut group = self.undo_stack.pop_back()?;
        group.timestamp = None;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    /// Pops the newest undone group for redo. The caller re-applies its edits
    /// first-to-last.
    pub fn redo(&mut self) -> Option<EditGroup> {
        let group = self.redo_stack.pop()?;
        self.undo_stack.push_back(group.clone());
        Some(group)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.in_group = false;
        self.group_pending = false;
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> History {
        History::new(100).with_coalesce_threshold(Duration::ZERO)
    }

    #[test]
    fn test_edit_inverse() {
        let insert = Edit::insert(0, "hello");
        let inverse = insert.inverse();

        assert_eq!(inverse.kind, EditKind::Delete);
        assert_eq!(inverse.position, 0);
        assert_eq!(inverse.content, "hello");
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = history();

        history.push(Edit::insert(0, "a"));
        history.push(Edit::insert(1, "b"));
        assert_eq!(history.undo_count(), 2);

        let group = history.undo().unwrap();
        assert_eq!(group.edits[0].content, "b");
        assert!(history.can_redo());

        let group = history.redo().unwrap();
        assert_eq!(group.edits[0].content, "b");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_rapid_typing_coalesces() {
        let mut history = History::new(100).with_coalesce_threshold(Duration::from_secs(60));
        history.push(Edit::insert(0, "a"));
        history.push(Edit::insert(1, "b"));
        history.push(Edit::insert(2, "c"));

        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.undo().unwrap().edits[0].content, "abc");
    }

    #[test]
    fn test_newline_breaks_coalescing() {
        let mut history = History::new(100).with_coalesce_threshold(Duration::from_secs(60));
        history.push(Edit::insert(0, "a"));
        history.push(Edit::insert(1, "\n"));
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_group_is_single_step() {
        let mut history = History::new(100).with_coalesce_threshold(Duration::from_secs(60));
        history.push(Edit::insert(0, "x"));

        history.begin_group();
        history.push(Edit::delete(0, "x"));
        history.push(Edit::insert(0, "yz"));
        history.end_group();

        assert_eq!(history.undo_count(), 2);
        let group = history.undo().unwrap();
        assert_eq!(group.edits.len(), 2);
        assert_eq!(group.undo_cursor(), 0);
        assert_eq!(group.redo_cursor(), 2);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = history();
        history.push(Edit::insert(0, "a"));
        history.undo();
        assert!(history.can_redo());

        history.push(Edit::insert(0, "b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(2).with_coalesce_threshold(Duration::ZERO);
        history.push(Edit::insert(0, "a"));
        history.push(Edit::insert(1, "b"));
        history.push(Edit::insert(2, "c"));

        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.undo().unwrap().edits[0].content, "c");
        assert_eq!(history.undo().unwrap().edits[0].content, "b");
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_edit_coalescing() {
        let mut e1 = Edit::insert(0, "a");
        let e2 = Edit::insert(1, "b");

        assert!(e1.can_coalesce(&e2));
        e1.coalesce(e2);
        assert_eq!(e1.content, "ab");

        let mut backspace = Edit::delete(4, "d");
        let previous = Edit::delete(3, "c");
        assert!(backspace.can_coalesce(&previous));
        backspace.coalesce(previous);
        assert_eq!(backspace.content, "cd");
        assert_eq!(backspace.position, 3);
    }
}
