//! Reusable UI components.

pub mod editor_view;

pub use editor_view::{EditorMessage, EditorView, key_press_from_iced};
