//! Style definitions for UI components.
//!
//! Every style is derived from the active color scheme so that switching
//! themes restyles the whole window, not only the editor.

use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme};
use pylearn_core::ConcreteTheme;

use crate::theme::to_iced;

/// Layout constants shared by the pages.
pub struct Metrics {
    pub page_padding: u16,
    pub section_spacing: u16,
    pub card_width: f32,
    pub output_height: f32,
}

pub const METRICS: Metrics = Metrics {
    page_padding: 24,
    section_spacing: 16,
    card_width: 320.0,
    output_height: 180.0,
};

pub fn page(scheme: &'static ConcreteTheme) -> impl Fn(&Theme) -> container::Style {
    move |_| container::Style {
        background: Some(Background::Color(to_iced(scheme.background))),
        text_color: Some(to_iced(scheme.foreground)),
        ..Default::default()
    }
}

pub fn toolbar(scheme: &'static ConcreteTheme) -> impl Fn(&Theme) -> container::Style {
    move |_| container::Style {
        background: Some(Background::Color(to_iced(scheme.gutter))),
        border: Border {
            color: to_iced(scheme.selection),
            width: 1.0,
            radius: 0.0.into(),
        },
        text_color: Some(to_iced(scheme.foreground)),
        ..Default::default()
    }
}

pub fn card(scheme: &'static ConcreteTheme) -> impl Fn(&Theme) -> container::Style {
    move |_| container::Style {
        background: Some(Background::Color(to_iced(scheme.gutter))),
        border: Border {
            color: to_iced(scheme.selection),
            width: 1.0,
            radius: 6.0.into(),
        },
        text_color: Some(to_iced(scheme.foreground)),
        shadow: Shadow::default(),
    }
}

/// Output panel; failures use the scheme's error color.
pub fn output(scheme: &'static ConcreteTheme, is_error: bool) -> impl Fn(&Theme) -> container::Style {
    move |_| {
        let text = if is_error {
            scheme.error_text
        } else {
            scheme.output_text
        };
        container::Style {
            background: Some(Background::Color(to_iced(scheme.output_background))),
            border: Border {
                color: if is_error {
                    to_iced(scheme.error_text.with_alpha(0.6))
                } else {
                    to_iced(scheme.selection)
                },
                width: 1.0,
                radius: 4.0.into(),
            },
            text_color: Some(to_iced(text)),
            ..Default::default()
        }
    }
}

/// Offline / error strip under the toolbar.
pub fn banner(scheme: &'static ConcreteTheme) -> impl Fn(&Theme) -> container::Style {
    move |_| container::Style {
        background: Some(Background::Color(to_iced(scheme.error_text.with_alpha(0.15)))),
        border: Border {
            color: to_iced(scheme.error_text.with_alpha(0.5)),
            width: 1.0,
            radius: 4.0.into(),
        },
        text_color: Some(to_iced(scheme.foreground)),
        ..Default::default()
    }
}

pub fn action_button(
    scheme: &'static ConcreteTheme,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, status| {
        let base = to_iced(scheme.accent);
        let background = match status {
            button::Status::Hovered => Color { a: 0.85, ..base },
            button::Status::Disabled => Color { a: 0.4, ..base },
            _ => base,
        };
        button::Style {
            background: Some(Background::Color(background)),
            text_color: to_iced(scheme.background),
            border: Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

pub fn subtle_button(
    scheme: &'static ConcreteTheme,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, status| {
        let background = match status {
            button::Status::Hovered => to_iced(scheme.selection),
            _ => Color::TRANSPARENT,
        };
        let text_color = match status {
            button::Status::Disabled => to_iced(scheme.gutter_text),
            _ => to_iced(scheme.foreground),
        };
        button::Style {
            background: Some(Background::Color(background)),
            text_color,
            border: Border {
                color: to_iced(scheme.selection),
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        }
    }
}

/// Editor tab header; the active tab is underlined with the accent color.
pub fn tab_button(
    scheme: &'static ConcreteTheme,
    active: bool,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, status| {
        let background = match status {
            button::Status::Hovered if !active => to_iced(scheme.selection),
            _ if active => to_iced(scheme.background),
            _ => to_iced(scheme.gutter),
        };
        button::Style {
            background: Some(Background::Color(background)),
            text_color: if active {
                to_iced(scheme.foreground)
            } else {
                to_iced(scheme.gutter_text)
            },
            border: Border {
                color: if active {
                    to_iced(scheme.accent)
                } else {
                    Color::TRANSPARENT
                },
                width: if active { 2.0 } else { 0.0 },
                radius: 0.0.into(),
            },
            ..Default::default()
        }
    }
}

/// Completion chip, tinted with the color of its kind.
pub fn chip(
    scheme: &'static ConcreteTheme,
    tint: pylearn_core::Color,
) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_, status| {
        let background = match status {
            button::Status::Hovered => to_iced(scheme.selection),
            _ => to_iced(scheme.gutter),
        };
        button::Style {
            background: Some(Background::Color(background)),
            text_color: to_iced(tint),
            border: Border {
                color: to_iced(tint.with_alpha(0.5)),
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        }
    }
}
