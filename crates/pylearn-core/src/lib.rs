//! # PyLearn Core
//!
//! Editor state and the small services around it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     EditorCore                        │
//! │  ┌────────────┐ ┌──────────┐ ┌─────────────────────┐ │
//! │  │ TextBuffer │ │  Keymap  │ │ CompletionProvider  │ │
//! │  └────────────┘ └──────────┘ └─────────────────────┘ │
//! │        │ on_text_change / on_execute_requested        │
//! └────────┼─────────────────────────────────────────────┘
//!          ▼
//!   EditorHandlers ──► EventQueue ──► page update loop
//!
//!   ThemeId ──► ConcreteTheme (static table)
//!   PreferenceStore ──► { theme, recommendations }
//!   Config ──► api / editor / ui sections
//! ```

pub mod config;
pub mod editor;
pub mod event;
pub mod keymap;
pub mod prefs;
pub mod theme;

pub use config::{Config, ConfigError};
pub use editor::{EditorCore, EditorOptions, EditorSettings, KeyOutcome};
pub use event::{EditorEvent, EditorHandlers, EventQueue};
pub use keymap::{EditorAction, Key, KeyPress, Keymap, Modifiers};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, Preference, PreferenceStore};
pub use theme::{Appearance, Color, ConcreteTheme, ThemeId};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] pylearn_buffer::BufferError),
}
