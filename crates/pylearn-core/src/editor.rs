//! The code editor core.
//!
//! ## Learning: The Facade Pattern
//!
//! `EditorCore` is the one object a page talks to. Behind it sit the text
//! buffer (with undo history), the selection, the resolved theme, the keymap
//! and the completion provider. Nothing here does I/O, so no operation can
//! fail from the caller's point of view.
//!
//! ## Live Reconfiguration
//!
//! Theme and recommendations are plain fields. Changing them never touches
//! the buffer, the selection or the history, so a student can switch themes
//! mid-edit and still undo what they typed before.

use std::ops::Range;

use pylearn_buffer::{History, Position, Selection, TextBuffer};
use pylearn_syntax::{Completion, CompletionProvider, CompletionSet};

use crate::config::Config;
use crate::event::EditorHandlers;
use crate::keymap::{EditorAction, Key, KeyPress, Keymap};
use crate::theme::{Appearance, ConcreteTheme, ThemeId};
use crate::CoreResult;

/// What the page supplies when it mounts an editor.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub initial_text: String,
    /// Theme id string; unknown ids fall back to the ambient default
    pub theme: String,
    pub recommendations_enabled: bool,
}

/// Settings that come from configuration rather than the page.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub ambient: Appearance,
    pub tab_size: usize,
    pub undo_limit: usize,
    pub max_completions: usize,
    pub keymap: Keymap,
}

impl EditorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ambient: config.ui.appearance,
            tab_size: config.editor.tab_size.max(1),
            undo_limit: config.editor.undo_limit,
            max_completions: config.editor.max_completions,
            keymap: Keymap::from_config(&config.editor),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of feeding a key press to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A run combination; the execute handler fired and no text changed
    ExecuteRequested,
    /// The text changed
    Edited,
    /// The key did something else (cursor, selection, empty undo)
    Handled,
    /// The key means nothing to the editor
    Ignored,
}

/// An editing session: text, selection, theme and recommendations.
pub struct EditorCore {
    buffer: TextBuffer,
    selection: Selection,
    theme_id: ThemeId,
    recommendations_enabled: bool,
    completion: Option<CompletionProvider>,
    settings: EditorSettings,
    handlers: EditorHandlers,
}

impl EditorCore {
    /// Creates an editor with default settings.
    pub fn new(options: EditorOptions, handlers: EditorHandlers) -> Self {
        Self::with_settings(options, handlers, EditorSettings::default())
    }

    /// Creates an editor with explicit settings.
    pub fn with_settings(
        options: EditorOptions,
        handlers: EditorHandlers,
        settings: EditorSettings,
    ) -> Self {
        let buffer =
            TextBuffer::with_history(&options.initial_text, History::new(settings.undo_limit));
        let completion = match CompletionProvider::new(settings.max_completions) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!("Recommendations unavailable: {}", e);
                None
            }
        };

        Self {
            buffer,
            selection: Selection::cursor(0),
            theme_id: ThemeId::parse_or_default(&options.theme, settings.ambient),
            recommendations_enabled: options.recommendations_enabled,
            completion,
            settings,
            handlers,
        }
    }

    // ==================== State ====================

    /// The full text.
    pub fn text(&self) -> String {
        self.buffer.text().into_owned()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Char offset of the cursor (the selection head).
    pub fn cursor_offset(&self) -> usize {
        self.selection.head
    }

    /// Line/column of the cursor.
    pub fn cursor_position(&self) -> Position {
        self.position_of(self.selection.head)
    }

    /// Line/column of a char offset, clamped to the text.
    pub fn position_of(&self, offset: usize) -> Position {
        self.buffer
            .char_idx_to_position(offset.min(self.buffer.len_chars()))
            .unwrap_or_default()
    }

    /// Char offset of a line/column, clamped to the text.
    pub fn offset_of(&self, pos: Position) -> usize {
        let last_line = self.buffer.len_lines().saturating_sub(1);
        let line = pos.line.min(last_line);
        let column = pos.column.min(self.line_len(line));
        self.buffer
            .position_to_char_idx(Position::new(line, column))
            .unwrap_or(self.buffer.len_chars())
    }

    pub fn undo_depth(&self) -> usize {
        self.buffer.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.buffer.redo_depth()
    }

    pub fn theme_id(&self) -> ThemeId {
        self.theme_id
    }

    /// The resolved color scheme.
    pub fn theme(&self) -> &'static ConcreteTheme {
        self.theme_id.theme()
    }

    pub fn recommendations_enabled(&self) -> bool {
        self.recommendations_enabled
    }

    pub fn keymap(&self) -> &Keymap {
        &self.settings.keymap
    }

    // ==================== Reconfiguration ====================

    /// Switches the theme in place.
    pub fn set_theme(&mut self, theme: &str) {
        self.theme_id = ThemeId::parse_or_default(theme, self.settings.ambient);
    }

    /// Turns recommendations on or off in place.
    pub fn set_recommendations_enabled(&mut self, enabled: bool) {
        self.recommendations_enabled = enabled;
    }

    /// Replaces the content and forgets all history. The cursor goes to the
    /// start.
    pub fn reset(&mut self, text: &str) {
        self.buffer.reset(text);
        self.selection = Selection::cursor(0);
        self.notify_change();
    }

    // ==================== Keys ====================

    /// Handles a key press from the editing surface.
    pub fn handle_key(&mut self, key: KeyPress) -> KeyOutcome {
        if let Some(action) = self.settings.keymap.action(&key) {
            return self.perform(action);
        }

        let mods = key.modifiers;
        if !mods.is_typing() {
            return KeyOutcome::Ignored;
        }

        match key.key {
            Key::Char(c) => self.edited(|core| core.insert_text(&c.to_string())),
            Key::Space => self.edited(|core| core.insert_text(" ")),
            Key::Enter => self.edited(|core| core.insert_newline()),
            Key::Backspace => self.edited(|core| core.delete_backward()),
            Key::Delete => self.edited(|core| core.delete_forward()),
            Key::Left => {
                self.move_horizontal(false, mods.shift);
                KeyOutcome::Handled
            }
            Key::Right => {
                self.move_horizontal(true, mods.shift);
                KeyOutcome::Handled
            }
            Key::Home => {
                let line = self.cursor_position().line;
                self.move_to(self.offset_of(Position::new(line, 0)), mods.shift);
                KeyOutcome::Handled
            }
            Key::End => {
                let line = self.cursor_position().line;
                self.move_to(self.offset_of(Position::new(line, usize::MAX)), mods.shift);
                KeyOutcome::Handled
            }
            Key::Tab | Key::Escape => KeyOutcome::Ignored,
        }
    }

    fn perform(&mut self, action: EditorAction) -> KeyOutcome {
        match action {
            EditorAction::Run => {
                tracing::debug!("Run requested from keyboard");
                (self.handlers.on_execute_requested)();
                KeyOutcome::ExecuteRequested
            }
            EditorAction::Undo => self.edited(Self::undo),
            EditorAction::Redo => self.edited(Self::redo),
            EditorAction::Indent => self.edited(|core| core.indent()),
            EditorAction::SelectAll => {
                self.select_all();
                KeyOutcome::Handled
            }
        }
    }

    fn edited(&mut self, edit: impl FnOnce(&mut Self) -> bool) -> KeyOutcome {
        if edit(self) {
            KeyOutcome::Edited
        } else {
            KeyOutcome::Handled
        }
    }

    // ==================== Edits ====================

    /// Replaces the selection with `text`. Returns true if the text changed.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let range = self.selection.range();
        if range.is_empty() && text.is_empty() {
            return false;
        }
        let cursor = range.start + text.chars().count();
        self.apply(range, text, cursor)
    }

    /// Deletes the selection, or the character before the cursor.
    pub fn delete_backward(&mut self) -> bool {
        let range = if self.selection.is_cursor() {
            let head = self.selection.head;
            if head == 0 {
                return false;
            }
            head - 1..head
        } else {
            self.selection.range()
        };
        let cursor = range.start;
        self.apply(range, "", cursor)
    }

    /// Deletes the selection, or the character after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        let range = if self.selection.is_cursor() {
            let head = self.selection.head;
            if head >= self.buffer.len_chars() {
                return false;
            }
            head..head + 1
        } else {
            self.selection.range()
        };
        let cursor = range.start;
        self.apply(range, "", cursor)
    }

    /// Inserts spaces up to the next tab stop.
    pub fn indent(&mut self) -> bool {
        let tab = self.settings.tab_size;
        let column = self.position_of(self.selection.start()).column;
        let width = tab - column % tab;
        self.insert_text(&" ".repeat(width))
    }

    /// Inserts a newline that keeps the current indentation, one level
    /// deeper after a line ending in `:`.
    fn insert_newline(&mut self) -> bool {
        let pos = self.position_of(self.selection.start());
        let line_start = self.offset_of(Position::new(pos.line, 0));
        let before: String = self
            .buffer
            .slice(line_start..self.selection.start())
            .map(|s| s.into_owned())
            .unwrap_or_default();

        let mut indent: String = before.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        if before.trim_end().ends_with(':') {
            indent.push_str(&" ".repeat(self.settings.tab_size));
        }
        self.insert_text(&format!("\n{}", indent))
    }

    /// Sets the selection, clamped to the text.
    pub fn select(&mut self, anchor: usize, head: usize) {
        self.selection = Selection::new(anchor, head).clamp(self.buffer.len_chars());
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.buffer.len_chars());
    }

    /// Collapses the selection to `offset`, clamped to the text.
    pub fn set_cursor(&mut self, offset: usize) {
        self.selection = Selection::cursor(offset.min(self.buffer.len_chars()));
    }

    fn move_to(&mut self, offset: usize, extend: bool) {
        if extend {
            self.selection = Selection::new(self.selection.anchor, offset);
        } else {
            self.selection = Selection::cursor(offset);
        }
    }

    fn move_horizontal(&mut self, forward: bool, extend: bool) {
        if !extend && !self.selection.is_cursor() {
            let edge = if forward {
                self.selection.end()
            } else {
                self.selection.start()
            };
            self.selection = Selection::cursor(edge);
            return;
        }

        let head = self.selection.head;
        let target = if forward {
            (head + 1).min(self.buffer.len_chars())
        } else {
            head.saturating_sub(1)
        };
        self.move_to(target, extend);
    }

    /// Undoes one step. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.buffer.undo() {
            Ok(group) => {
                self.set_cursor(group.undo_cursor());
                self.notify_change();
                true
            }
            Err(_) => false,
        }
    }

    /// Redoes one step. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.buffer.redo() {
            Ok(group) => {
                self.set_cursor(group.redo_cursor());
                self.notify_change();
                true
            }
            Err(_) => false,
        }
    }

    /// Takes the text reported by a rendering surface that edits its own
    /// copy, and records the difference as one undoable edit.
    ///
    /// Returns true if the text changed.
    pub fn sync_from_surface(&mut self, text: &str) -> bool {
        match self.buffer.sync_to(text) {
            Ok(Some(change)) => {
                self.set_cursor(change.range.start + change.inserted.chars().count());
                self.notify_change();
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Surface sync failed: {}", e);
                false
            }
        }
    }

    // ==================== Recommendations ====================

    /// Completion candidates at the cursor; empty when recommendations are
    /// off or something is selected.
    pub fn completions(&mut self) -> CompletionSet {
        if !self.recommendations_enabled || !self.selection.is_cursor() {
            return CompletionSet::default();
        }
        let text = self.buffer.text().into_owned();
        let cursor = self.selection.head;
        match &mut self.completion {
            Some(provider) => provider.complete(&text, cursor),
            None => CompletionSet::default(),
        }
    }

    /// Replaces the identifier prefix before the cursor with `completion`.
    pub fn accept_completion(&mut self, completion: &Completion) -> bool {
        if !self.selection.is_cursor() {
            return false;
        }
        let head = self.selection.head;
        let prefix_len = self
            .buffer
            .slice(0..head)
            .map(|before| {
                before
                    .chars()
                    .rev()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .count()
            })
            .unwrap_or(0);

        let start = head - prefix_len;
        let cursor = start + completion.label.chars().count();
        self.apply(start..head, &completion.label, cursor)
    }

    // ==================== Internals ====================

    fn apply(&mut self, range: Range<usize>, text: &str, cursor: usize) -> bool {
        match self.try_apply(range, text) {
            Ok(()) => {
                self.set_cursor(cursor);
                self.notify_change();
                true
            }
            Err(e) => {
                tracing::warn!("Edit rejected: {}", e);
                false
            }
        }
    }

    fn try_apply(&mut self, range: Range<usize>, text: &str) -> CoreResult<()> {
        self.buffer.replace(range, text)?;
        Ok(())
    }

    fn notify_change(&mut self) {
        let text = self.buffer.text();
        (self.handlers.on_text_change)(&text);
    }

    /// Length of `line` without its line break.
    fn line_len(&self, line: usize) -> usize {
        self.buffer
            .line(line)
            .map(|l| l.trim_end_matches(['\n', '\r']).chars().count())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EditorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCore")
            .field("selection", &self.selection)
            .field("theme_id", &self.theme_id)
            .field("recommendations_enabled", &self.recommendations_enabled)
            .field("undo_depth", &self.undo_depth())
            .finish_non_exhaustive()
    }
}
