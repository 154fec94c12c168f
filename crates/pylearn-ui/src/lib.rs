//! # PyLearn UI
//!
//! The desktop shell: chapter list, topic exercises, the exercise page with
//! its code editor, and token usage.
//!
//! ## Architecture
//!
//! The UI follows the Elm architecture (TEA):
//! - **Model**: `App` and its page states
//! - **Message**: everything that can happen, including finished requests
//! - **Update**: applies a message and returns follow-up `Task`s
//! - **View**: draws the current state
//!
//! Every backend call is a `Task`. Finished calls come back as messages, so
//! state only ever changes inside `update`.

pub mod app;
pub mod components;
pub mod highlighter;
pub mod style;
pub mod theme;

pub use app::{App, Flags, run};
