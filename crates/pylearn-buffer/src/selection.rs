//! Text selection handling.
//!
//! A selection is an `anchor` (where it started) and a `head` (where the
//! cursor is), both char offsets. `anchor == head` is a plain cursor.
//! Ranges derived from it are exclusive at the end, so an empty selection
//! is the natural `start..start`.

use crate::history::{Edit, EditKind};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A directed selection in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Where the cursor is
    pub head: usize,
}

impl Selection {
    /// Creates a selection from anchor to head.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Creates a zero-width selection (cursor position).
    pub fn cursor(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Lower bound of the selected range.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound (exclusive) of the selected range.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// The selected range.
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Returns true if this is a zero-width selection.
    pub fn is_cursor(&self) -> bool {
        self.anchor == self.head
    }

    /// Number of selected characters.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.is_cursor()
    }

    /// Clamps both ends to a document of `len_chars` characters.
    pub fn clamp(self, len_chars: usize) -> Self {
        Self {
            anchor: self.anchor.min(len_chars),
            head: self.head.min(len_chars),
        }
    }

    /// Maps this selection through an edit applied elsewhere in the text.
    pub fn map_through(self, edit: &Edit) -> Self {
        Self {
            anchor: map_offset(self.anchor, edit),
            head: map_offset(self.head, edit),
        }
    }
}

fn map_offset(offset: usize, edit: &Edit) -> usize {
    let len = edit.len_chars();
    match edit.kind {
        EditKind::Insert => {
            if offset >= edit.position {
                offset + len
            } else {
                offset
            }
        }
        EditKind::Delete => {
            if offset <= edit.position {
                offset
            } else if offset >= edit.position + len {
                offset - len
            } else {
                edit.position
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(10, 3);
        assert_eq!(sel.start(), 3);
        assert_eq!(sel.end(), 10);
        assert_eq!(sel.range(), 3..10);
        assert_eq!(sel.len(), 7);
        assert!(!sel.is_cursor());
    }

    #[test]
    fn test_selection_clamp() {
        let sel = Selection::new(2, 40).clamp(12);
        assert_eq!(sel, Selection::new(2, 12));
    }

    #[test]
    fn test_map_through_insert() {
        let sel = Selection::new(4, 8);
        assert_eq!(sel.map_through(&Edit::insert(0, "ab")), Selection::new(6, 10));
        assert_eq!(sel.map_through(&Edit::insert(9, "ab")), sel);
    }

    #[test]
    fn test_map_through_delete() {
        let sel = Selection::new(4, 8);
        assert_eq!(sel.map_through(&Edit::delete(0, "ab")), Selection::new(2, 6));
        // Deletion swallowing the anchor collapses it onto the deletion point
        assert_eq!(sel.map_through(&Edit::delete(3, "xyz")), Selection::new(3, 5));
    }
}
