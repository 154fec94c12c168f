//! # PyLearn Buffer
//!
//! Text storage for the exercise editor.
//!
//! ## Key Concepts
//!
//! ### Ownership & Borrowing
//! - `TextBuffer` owns the rope and the undo history
//! - Reads like `text()` borrow, mutations take `&mut self`
//!
//! ### Char offsets everywhere
//! All offsets are character indices, never bytes. The editor widget and the
//! selection model agree on this, so a selection can be mapped through an
//! edit without re-encoding.

mod buffer;
mod cursor;
mod history;
mod selection;

pub use buffer::{TextBuffer, TextChange};
pub use cursor::Position;
pub use history::{Edit, EditGroup, EditKind, History};
pub use selection::Selection;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of bounds")]
    PositionOutOfBounds { line: usize, column: usize },

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
    }

    #[test]
    fn test_buffer_from_string() {
        let buffer = TextBuffer::from("squares = [x**2 for x in range(1, 11)]");
        assert_eq!(buffer.len_chars(), 38);
        assert_eq!(buffer.text(), "squares = [x**2 for x in range(1, 11)]");
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "print").unwrap();
        buffer.insert(5, "('x')").unwrap();
        assert_eq!(buffer.text(), "print('x')");

        buffer.delete(5..6).unwrap();
        assert_eq!(buffer.text(), "print'x')");
    }

    #[test]
    fn test_line_operations() {
        let buffer = TextBuffer::from("a = 1\nb = 2\nb");
        assert_eq!(buffer.len_lines(), 3);
        assert_eq!(buffer.line(0).unwrap(), "a = 1\n");
        assert_eq!(buffer.line(2).unwrap(), "b");
        assert!(buffer.line(3).is_err());
    }
}
