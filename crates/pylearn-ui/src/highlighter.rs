//! Syntax highlighting integration for the editor.
//!
//! Parsing happens outside the widget: every edit reparses the source into
//! [`LineHighlights`] and bumps a revision number. The widget only looks up
//! the precomputed spans of the line it is drawing and colors them with the
//! active scheme.

use iced::advanced::text::highlighter::{Format, Highlighter};
use iced::{Color, Font};
use pylearn_core::ThemeId;
use pylearn_syntax::LineHighlights;
use std::ops::Range;
use std::sync::Arc;

use crate::theme::to_iced;

/// Settings for the highlighter.
///
/// Two settings are equal when they carry the same theme and revision, so
/// the widget re-highlights exactly when either changes.
#[derive(Debug, Clone)]
pub struct HighlightSettings {
    pub theme: ThemeId,
    pub revision: u64,
    pub lines: Arc<LineHighlights>,
}

impl PartialEq for HighlightSettings {
    fn eq(&self, other: &Self) -> bool {
        self.theme == other.theme && self.revision == other.revision
    }
}

/// Format for highlighted text.
#[derive(Debug, Clone, Copy)]
pub struct HighlightFormat {
    pub color: Color,
}

impl HighlightFormat {
    pub fn to_format(self) -> Format<Font> {
        Format {
            color: Some(self.color),
            font: None,
        }
    }
}

/// Syntax highlighter for the text editor.
pub struct EditorHighlighter {
    theme: ThemeId,
    lines: Arc<LineHighlights>,
    current_line: usize,
}

impl Highlighter for EditorHighlighter {
    type Settings = HighlightSettings;
    type Highlight = HighlightFormat;
    type Iterator<'a> = std::vec::IntoIter<(Range<usize>, HighlightFormat)> where Self: 'a;

    fn new(settings: &Self::Settings) -> Self {
        Self {
            theme: settings.theme,
            lines: Arc::clone(&settings.lines),
            current_line: 0,
        }
    }

    fn update(&mut self, new_settings: &Self::Settings) {
        self.theme = new_settings.theme;
        self.lines = Arc::clone(&new_settings.lines);
        self.current_line = 0;
    }

    fn change_line(&mut self, line: usize) {
        self.current_line = line;
    }

    fn highlight_line(&mut self, line: &str) -> Self::Iterator<'_> {
        let spans = spans_for_line(&self.lines, self.theme, self.current_line, line);
        self.current_line += 1;
        spans.into_iter()
    }

    fn current_line(&self) -> usize {
        self.current_line
    }
}

/// Colored ranges for one line. Ranges are clipped to `text`, which may be
/// shorter than what was parsed if the widget is a frame behind.
fn spans_for_line(
    lines: &LineHighlights,
    theme: ThemeId,
    index: usize,
    text: &str,
) -> Vec<(Range<usize>, HighlightFormat)> {
    let scheme = theme.theme();
    lines
        .line(index)
        .iter()
        .filter_map(|span| {
            let start = span.range.start.min(text.len());
            let end = span.range.end.min(text.len());
            if start >= end || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
                return None;
            }
            let color = to_iced(scheme.syntax_color(span.kind));
            Some((start..end, HighlightFormat { color }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pylearn_syntax::Highlighter as SourceHighlighter;

    fn settings(source: &str, revision: u64) -> HighlightSettings {
        let mut parser = SourceHighlighter::python().unwrap();
        HighlightSettings {
            theme: ThemeId::Dracula,
            revision,
            lines: Arc::new(parser.highlight_lines(source).unwrap()),
        }
    }

    #[test]
    fn test_settings_equality_ignores_payload() {
        let a = settings("x = 1", 1);
        let b = settings("y = 2", 1);
        assert_eq!(a, b);
        assert_ne!(a, settings("x = 1", 2));
    }

    #[test]
    fn test_lines_are_walked_in_order() {
        let source = "def f():\n    return 1";
        let mut highlighter = EditorHighlighter::new(&settings(source, 1));

        let first: Vec<_> = highlighter.highlight_line("def f():").collect();
        assert_eq!(first[0].0, 0..3);
        assert_eq!(highlighter.current_line(), 1);

        let second: Vec<_> = highlighter.highlight_line("    return 1").collect();
        assert!(second.iter().any(|(range, _)| *range == (4..10)));

        highlighter.change_line(0);
        assert_eq!(highlighter.current_line(), 0);
    }

    #[test]
    fn test_spans_clipped_to_line() {
        let s = settings("print('hello')", 1);
        let spans = spans_for_line(&s.lines, s.theme, 0, "print(");
        assert!(spans.iter().all(|(range, _)| range.end <= 6));
        assert!(spans_for_line(&s.lines, s.theme, 5, "anything").is_empty());
    }

    #[test]
    fn test_theme_changes_colors() {
        let source = "def f():";
        let lines = settings(source, 1).lines;
        let dark = spans_for_line(&lines, ThemeId::Dracula, 0, source);
        let light = spans_for_line(&lines, ThemeId::GithubLight, 0, source);
        assert_ne!(dark[0].1.color, light[0].1.color);
    }
}
