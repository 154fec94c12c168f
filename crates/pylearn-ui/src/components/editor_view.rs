//! The exercise code editor.
//!
//! Two copies of the text exist. `EditorCore` owns the authoritative one
//! along with the undo history, theme and recommendations. The iced
//! `text_editor::Content` owns what is drawn and handles typing, mouse
//! selection and clipboard on its own.
//!
//! Plain typing flows surface → core: after the widget applies an edit, the
//! surface text is diffed into the core as one undoable change. Keys the
//! core owns (run, undo/redo, Tab, Enter with auto-indent) flow core →
//! surface: the widget never sees them, and after the core edits its text
//! the surface is overwritten and the cursor put back.

use std::sync::Arc;

use iced::widget::text_editor::{self, Action, Binding, Content, Edit, Motion};
use iced::widget::{button, column, container, scrollable, text, Row};
use iced::{Border, Background, Color, Element, Font, Length, Padding, Theme, keyboard};
use pylearn_buffer::Position;
use pylearn_client::ExecutionResult;
use pylearn_core::{
    EditorAction, EditorCore, EditorEvent, EditorHandlers, EditorOptions, EditorSettings,
    EventQueue, Key, KeyOutcome, KeyPress, Keymap, Modifiers, Preference,
};
use pylearn_syntax::{Completion, CompletionKind, Highlighter, LineHighlights};

use crate::highlighter::{EditorHighlighter, HighlightSettings};
use crate::style::{self, METRICS};
use crate::theme::to_iced;

/// Messages produced by one editor.
#[derive(Debug, Clone)]
pub enum EditorMessage {
    /// Something the widget handles itself
    Action(text_editor::Action),
    /// A key the core handles
    Key(KeyPress),
    /// A recommendation chip was clicked
    AcceptCompletion(usize),
}

/// An editor surface together with its core and last run output.
pub struct EditorView {
    core: EditorCore,
    events: EventQueue,
    content: Content,
    highlighter: Option<Highlighter>,
    lines: Arc<LineHighlights>,
    revision: u64,
    completions: Vec<Completion>,
    /// Result of the last finished run
    pub output: Option<ExecutionResult>,
    /// A run was started and has not finished yet
    pub running: bool,
}

impl EditorView {
    pub fn new(text: &str, preference: Preference, settings: EditorSettings) -> Self {
        let text = normalize_line_endings(text);
        let text = text.as_str();
        let (handlers, events) = EditorHandlers::channel();
        let core = EditorCore::with_settings(
            EditorOptions {
                initial_text: text.to_string(),
                theme: preference.theme_id.as_str().to_string(),
                recommendations_enabled: preference.recommendations_enabled,
            },
            handlers,
            settings,
        );
        let highlighter = match Highlighter::python() {
            Ok(highlighter) => Some(highlighter),
            Err(e) => {
                tracing::warn!("Highlighting unavailable: {}", e);
                None
            }
        };

        let mut view = Self {
            core,
            events,
            content: Content::with_text(text),
            highlighter,
            lines: Arc::default(),
            revision: 0,
            completions: Vec::new(),
            output: None,
            running: false,
        };
        view.rehighlight();
        view
    }

    pub fn text(&self) -> String {
        self.core.text()
    }

    pub fn core(&self) -> &EditorCore {
        &self.core
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Applies a message. Returns true when the user asked to run the code.
    pub fn update(&mut self, message: EditorMessage) -> bool {
        let moved = match message {
            EditorMessage::Action(action) => self.perform(action),
            EditorMessage::Key(press) => {
                self.handle_key(press);
                true
            }
            EditorMessage::AcceptCompletion(index) => {
                if let Some(completion) = self.completions.get(index).cloned() {
                    if self.core.accept_completion(&completion) {
                        self.push_to_surface();
                    }
                }
                true
            }
        };

        let run = self.drain_events();
        if moved {
            self.refresh_completions();
        }
        run
    }

    /// Replaces the whole text, dropping history.
    pub fn reset(&mut self, text: &str) {
        let text = normalize_line_endings(text);
        let text = text.as_str();
        self.core.reset(text);
        self.content = Content::with_text(text);
        self.drain_events();
        self.rehighlight();
        self.completions.clear();
        self.output = None;
        self.running = false;
    }

    /// Applies a new theme and recommendations setting.
    pub fn set_preference(&mut self, preference: Preference) {
        self.core.set_theme(preference.theme_id.as_str());
        self.core.set_recommendations_enabled(preference.recommendations_enabled);
        self.refresh_completions();
    }

    // ==================== Surface sync ====================

    /// Returns false for actions that leave text and cursor alone.
    fn perform(&mut self, action: Action) -> bool {
        let is_edit = action.is_edit();
        let is_scroll = matches!(action, Action::Scroll { .. });
        self.content.perform(action);

        if is_edit {
            self.core.sync_from_surface(&surface_text(&self.content));
        }
        if is_scroll {
            return false;
        }

        let (line, byte_column) = self.content.cursor_position();
        let column = char_column(&self.content, line, byte_column);
        let offset = self.core.offset_of(Position::new(line, column));
        self.core.set_cursor(offset);
        true
    }

    fn handle_key(&mut self, press: KeyPress) {
        if self.core.handle_key(press) == KeyOutcome::Edited {
            self.push_to_surface();
        }
    }

    /// Overwrites the surface with the core text and moves its cursor to
    /// the core cursor.
    fn push_to_surface(&mut self) {
        let text = self.core.text();
        if surface_text(&self.content) != text {
            self.content.perform(Action::SelectAll);
            let edit = if text.is_empty() {
                Edit::Delete
            } else {
                Edit::Paste(Arc::new(text))
            };
            self.content.perform(Action::Edit(edit));
        }
        place_cursor(&mut self.content, self.core.cursor_position());
    }

    fn drain_events(&mut self) -> bool {
        let mut run = false;
        let mut changed = false;
        for event in self.events.drain() {
            match event {
                EditorEvent::TextChanged(_) => changed = true,
                EditorEvent::ExecuteRequested => run = true,
            }
        }
        if changed {
            self.rehighlight();
        }
        run
    }

    fn rehighlight(&mut self) {
        let Some(highlighter) = &mut self.highlighter else {
            return;
        };
        match highlighter.highlight_lines(&self.core.text()) {
            Ok(lines) => {
                self.lines = Arc::new(lines);
                self.revision += 1;
            }
            Err(e) => tracing::warn!("Highlighting failed: {}", e),
        }
    }

    fn refresh_completions(&mut self) {
        self.completions = if self.content.selection().is_some() {
            Vec::new()
        } else {
            self.core.completions().items
        };
    }

    // ==================== View ====================

    pub fn view(&self, font_size: f32) -> Element<'_, EditorMessage> {
        let scheme = self.core.theme();
        let keymap = self.core.keymap().clone();
        let highlight_settings = HighlightSettings {
            theme: self.core.theme_id(),
            revision: self.revision,
            lines: Arc::clone(&self.lines),
        };

        let editor = iced::widget::text_editor(&self.content)
            .height(Length::Fill)
            .padding(Padding {
                top: 12.0,
                right: 16.0,
                bottom: 12.0,
                left: 12.0,
            })
            .font(Font::MONOSPACE)
            .size(font_size)
            .style(move |_theme: &Theme, _status| text_editor::Style {
                background: Background::Color(to_iced(scheme.background)),
                border: Border {
                    width: 1.0,
                    radius: 4.0.into(),
                    color: to_iced(scheme.selection),
                },
                icon: to_iced(scheme.gutter_text),
                placeholder: to_iced(scheme.gutter_text),
                value: to_iced(scheme.foreground),
                selection: to_iced(scheme.selection),
            })
            .highlight_with::<EditorHighlighter>(highlight_settings, |highlight, _theme| {
                highlight.to_format()
            })
            .key_binding(move |key_press| key_binding(&keymap, key_press))
            .on_action(EditorMessage::Action);

        if self.completions.is_empty() {
            return editor.into();
        }

        let chips = self.completions.iter().enumerate().map(|(index, completion)| {
            let tint = match completion.kind {
                CompletionKind::Keyword => scheme.syntax.keyword,
                CompletionKind::Builtin => scheme.syntax.builtin,
                CompletionKind::Identifier => scheme.foreground,
            };
            button(text(&completion.label).size(12).font(Font::MONOSPACE))
                .padding([2, 10])
                .style(style::chip(scheme, tint))
                .on_press(EditorMessage::AcceptCompletion(index))
                .into()
        });

        column![editor, Row::with_children(chips).spacing(6).wrap()]
            .spacing(6)
            .into()
    }

    /// The output panel under the editor.
    pub fn view_output<'a, Message: 'a>(&'a self) -> Element<'a, Message> {
        let scheme = self.core.theme();
        let (body, is_error) = match &self.output {
            _ if self.running => ("Running...", false),
            Some(result) => (result.text(), result.is_failure()),
            None => ("Run your code to see its output here.", false),
        };
        let color = if is_error {
            scheme.error_text
        } else if self.output.is_some() || self.running {
            scheme.output_text
        } else {
            scheme.gutter_text
        };

        container(scrollable(
            text(body)
                .font(Font::MONOSPACE)
                .size(13)
                .color(to_iced(color)),
        ))
        .padding(10)
        .width(Length::Fill)
        .height(METRICS.output_height)
        .style(style::output(scheme, is_error))
        .into()
    }
}

/// Decides who handles a key: the core (`Custom`) or the widget.
fn key_binding(keymap: &Keymap, key_press: text_editor::KeyPress) -> Option<Binding<EditorMessage>> {
    if !matches!(key_press.status, text_editor::Status::Focused) {
        return None;
    }

    if let Some(press) = key_press_from_iced(&key_press.key, key_press.modifiers) {
        match keymap.action(&press) {
            Some(EditorAction::SelectAll) => return Some(Binding::SelectAll),
            Some(_) => return Some(Binding::Custom(EditorMessage::Key(press))),
            None if press == KeyPress::plain(Key::Enter) => {
                return Some(Binding::Custom(EditorMessage::Key(press)));
            }
            None => {}
        }
    }

    Binding::from_key_press(key_press)
}

/// Translates an iced key event into the editor's key model. Keys the
/// editor has no name for give `None`.
pub fn key_press_from_iced(key: &keyboard::Key, modifiers: keyboard::Modifiers) -> Option<KeyPress> {
    use keyboard::key::Named;

    let key = match key {
        keyboard::Key::Named(named) => match named {
            Named::Enter => Key::Enter,
            Named::Tab => Key::Tab,
            Named::Backspace => Key::Backspace,
            Named::Delete => Key::Delete,
            Named::Escape => Key::Escape,
            Named::ArrowLeft => Key::Left,
            Named::ArrowRight => Key::Right,
            Named::Home => Key::Home,
            Named::End => Key::End,
            Named::Space => Key::Space,
            _ => return None,
        },
        keyboard::Key::Character(c) => {
            let mut chars = c.as_str().chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Key::Char(ch)
        }
        keyboard::Key::Unidentified => return None,
    };

    Some(KeyPress::new(
        key,
        Modifiers {
            ctrl: modifiers.control(),
            alt: modifiers.alt(),
            shift: modifiers.shift(),
            meta: modifiers.logo(),
        },
    ))
}

/// The widget splits on any line break and hands lines back without one, so
/// both copies use `\n` only.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn surface_text(content: &Content) -> String {
    let mut text = String::new();
    for (i, line) in content.lines().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&line);
    }
    text
}

/// The widget reports byte columns; the core counts chars.
fn char_column(content: &Content, line: usize, byte_column: usize) -> usize {
    content
        .line(line)
        .and_then(|text| text.get(..byte_column).map(|before| before.chars().count()))
        .unwrap_or(byte_column)
}

fn place_cursor(content: &mut Content, position: Position) {
    content.perform(Action::Move(Motion::DocumentStart));
    for _ in 0..position.line {
        content.perform(Action::Move(Motion::Down));
    }
    content.perform(Action::Move(Motion::Home));
    for _ in 0..position.column {
        content.perform(Action::Move(Motion::Right));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyboard::key::Named;

    fn view(text: &str) -> EditorView {
        EditorView::new(
            text,
            Preference::default_for(pylearn_core::Appearance::Dark),
            EditorSettings::default(),
        )
    }

    fn type_char(view: &mut EditorView, c: char) -> bool {
        view.update(EditorMessage::Action(Action::Edit(Edit::Insert(c))))
    }

    #[test]
    fn test_key_translation() {
        let enter = key_press_from_iced(
            &keyboard::Key::Named(Named::Enter),
            keyboard::Modifiers::SHIFT,
        )
        .unwrap();
        assert_eq!(enter, KeyPress::new(Key::Enter, Modifiers::SHIFT));

        let z = key_press_from_iced(&keyboard::Key::Character("z".into()), keyboard::Modifiers::CTRL)
            .unwrap();
        assert_eq!(z, KeyPress::new(Key::Char('z'), Modifiers::CTRL));

        assert!(key_press_from_iced(&keyboard::Key::Named(Named::F5), keyboard::Modifiers::empty()).is_none());
        assert!(key_press_from_iced(&keyboard::Key::Unidentified, keyboard::Modifiers::empty()).is_none());
    }

    #[test]
    fn test_typing_reaches_core() {
        let mut editor = view("");
        type_char(&mut editor, 'x');
        type_char(&mut editor, '=');
        assert_eq!(editor.text(), "x=");
        assert_eq!(editor.core().cursor_offset(), 2);
        assert!(editor.core().undo_depth() >= 1);
    }

    #[test]
    fn test_core_keys_update_surface() {
        let mut editor = view("");
        for c in "def f():".chars() {
            type_char(&mut editor, c);
        }

        editor.update(EditorMessage::Key(KeyPress::plain(Key::Enter)));
        assert_eq!(editor.text(), "def f():\n    ");
        assert_eq!(surface_text(&editor.content), "def f():\n    ");
        assert_eq!(editor.content.cursor_position(), (1, 4));

        editor.update(EditorMessage::Key(KeyPress::new(Key::Char('z'), Modifiers::CTRL)));
        assert_eq!(editor.text(), "def f():");
        assert_eq!(surface_text(&editor.content), "def f():");
    }

    #[test]
    fn test_crlf_text_is_normalized() {
        let mut editor = view("a = 1\r\nb = 2");
        assert_eq!(editor.text(), "a = 1\nb = 2");
        assert_eq!(surface_text(&editor.content), editor.text());

        type_char(&mut editor, 'x');
        assert_eq!(editor.core().undo_depth(), 1);
        assert!(!editor.text().contains('\r'));

        editor.update(EditorMessage::Key(KeyPress::new(Key::Char('z'), Modifiers::CTRL)));
        assert_eq!(editor.text(), "a = 1\nb = 2");

        editor.reset("x\r\ny");
        assert_eq!(editor.text(), "x\ny");
    }

    #[test]
    fn test_run_key_requests_run() {
        let mut editor = view("print(1)");
        let run = editor.update(EditorMessage::Key(KeyPress::new(Key::Enter, Modifiers::SHIFT)));
        assert!(run);
        assert_eq!(editor.text(), "print(1)");
    }

    #[test]
    fn test_reset_clears_output_and_history() {
        let mut editor = view("a");
        type_char(&mut editor, 'b');
        editor.output = Some(ExecutionResult::Success("ok".into()));
        editor.running = true;
        editor.reset("fresh");
        assert_eq!(editor.text(), "fresh");
        assert_eq!(editor.core().undo_depth(), 0);
        assert!(editor.output.is_none());
        assert!(!editor.running);
    }

    #[test]
    fn test_key_binding_routes_core_keys() {
        let keymap = Keymap::new();
        let press = |key, modifiers| text_editor::KeyPress {
            key,
            modifiers,
            text: None,
            status: text_editor::Status::Focused,
        };

        let tab = key_binding(&keymap, press(keyboard::Key::Named(Named::Tab), keyboard::Modifiers::empty()));
        assert!(matches!(tab, Some(Binding::Custom(EditorMessage::Key(_)))));

        let select = key_binding(&keymap, press(keyboard::Key::Character("a".into()), keyboard::Modifiers::CTRL));
        assert!(matches!(select, Some(Binding::SelectAll)));

        let unfocused = text_editor::KeyPress {
            status: text_editor::Status::Active,
            ..press(keyboard::Key::Named(Named::Tab), keyboard::Modifiers::empty())
        };
        assert!(key_binding(&keymap, unfocused).is_none());
    }
}
