//! Core text buffer implementation using a rope.
//!
//! ## Why Rope?
//!
//! Exercise code is small, but the buffer is edited once per keystroke and
//! diffed against the widget's copy on every change. A rope keeps inserts,
//! deletes and char/line conversions at O(log n) no matter where the cursor
//! sits.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::history::{Edit, EditGroup, EditKind, History};
use crate::{BufferError, BufferResult, Position};

/// A text buffer backed by a rope, with undo history.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    history: History,
}

/// What a surface sync changed: `range` (old char offsets) was replaced by
/// `inserted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub range: Range<usize>,
    pub inserted: String,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use pylearn_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            history: History::default(),
        }
    }

    /// Creates a buffer holding `text` with a custom history.
    pub fn with_history(text: &str, history: History) -> Self {
        Self {
            rope: Rope::from_str(text),
            history,
        }
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including its trailing newline.
    pub fn line(&self, line_idx: usize) -> BufferResult<Cow<'_, str>> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        Ok(self.rope.line(line_idx).into())
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        Ok(self.rope.slice(range).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// An empty buffer has 1 line; a trailing `\n` opens one more.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Deletes text in a character range and returns it.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.rope.remove(range);
        Ok(deleted)
    }

    /// Replaces text in a range. A delete followed by an insert is one
    /// undo step.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        let compound = !range.is_empty() && !text.is_empty();
        if compound {
            self.history.begin_group();
        }
        let result = self
            .delete(range.clone())
            .and_then(|deleted| self.insert(range.start, text).map(|_| deleted));
        if compound {
            self.history.end_group();
        }
        result
    }

    /// Replaces the whole content and forgets all history.
    pub fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.history.clear();
    }

    /// Brings the buffer in line with `new_text` as one recorded edit.
    ///
    /// Only the span between the common prefix and the common suffix is
    /// replaced, so typing a character through the widget records a
    /// one-character insert that still coalesces with its neighbours.
    pub fn sync_to(&mut self, new_text: &str) -> BufferResult<Option<TextChange>> {
        let old = self.text().into_owned();
        if old == new_text {
            return Ok(None);
        }

        let old_len = old.chars().count();
        let new_len = new_text.chars().count();

        let prefix = old
            .chars()
            .zip(new_text.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let max_suffix = old_len.min(new_len) - prefix;
        let suffix = old
            .chars()
            .rev()
            .zip(new_text.chars().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let range = prefix..old_len - suffix;
        let inserted: String = new_text
            .chars()
            .skip(prefix)
            .take(new_len - suffix - prefix)
            .collect();

        self.replace(range.clone(), &inserted)?;
        Ok(Some(TextChange { range, inserted }))
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last undo step and returns it.
    pub fn undo(&mut self) -> BufferResult<EditGroup> {
        let group = self.history.undo().ok_or(BufferError::NothingToUndo)?;
        for edit in group.edits.iter().rev() {
            self.apply_unrecorded(&edit.inverse());
        }
        Ok(group)
    }

    /// Redoes the last undone step and returns it.
    pub fn redo(&mut self) -> BufferResult<EditGroup> {
        let group = self.history.redo().ok_or(BufferError::NothingToRedo)?;
        for edit in &group.edits {
            self.apply_unrecorded(edit);
        }
        Ok(group)
    }

    fn apply_unrecorded(&mut self, edit: &Edit) {
        match edit.kind {
            EditKind::Insert => self.rope.insert(edit.position, &edit.content),
            EditKind::Delete => {
                let end = edit.position + edit.len_chars();
                self.rope.remove(edit.position..end);
            }
        }
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of available undo steps.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    /// Number of available redo steps.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_count()
    }

    // ==================== Position Conversion ====================

    /// Converts a Position (line, column) to a character index.
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();

        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(line_start + pos.column)
    }

    /// Converts a character index to a Position (line, column).
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line);
        Ok(Position { line, column })
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self::with_history(s, History::default())
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
