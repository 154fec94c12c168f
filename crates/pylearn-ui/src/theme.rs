//! Bridges the editor color schemes into iced.

use iced::theme::Palette;
use pylearn_core::{Color, ConcreteTheme, ThemeId};

/// Converts to iced Color.
pub fn to_iced(color: Color) -> iced::Color {
    iced::Color::from_rgba(color.r, color.g, color.b, color.a)
}

/// The application theme for a color scheme, so window chrome and editor
/// agree.
pub fn app_theme(scheme: &ConcreteTheme) -> iced::Theme {
    let palette = Palette {
        background: to_iced(scheme.background),
        text: to_iced(scheme.foreground),
        primary: to_iced(scheme.accent),
        success: to_iced(scheme.syntax.string),
        danger: to_iced(scheme.error_text),
    };
    iced::Theme::custom(scheme.display_name.to_string(), palette)
}

/// A theme id as shown in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChoice(pub ThemeId);

impl ThemeChoice {
    pub fn all() -> Vec<ThemeChoice> {
        ThemeId::all().iter().copied().map(ThemeChoice).collect()
    }
}

impl std::fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.theme().display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        let c = to_iced(Color::rgba(0.1, 0.2, 0.3, 0.4));
        assert_eq!(c, iced::Color::from_rgba(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn test_choices_cover_every_theme() {
        let choices = ThemeChoice::all();
        assert_eq!(choices.len(), ThemeId::all().len());
        for choice in choices {
            assert!(!choice.to_string().is_empty());
        }
    }
}
