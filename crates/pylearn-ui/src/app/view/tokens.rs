use iced::widget::{Column, button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Font, Length};

use super::loadable;
use crate::app::{App, Message, TokenUsage};
use crate::style::{self, METRICS};
use crate::theme::to_iced;

impl App {
    pub fn view_token_usage(&self) -> Element<'_, Message> {
        let scheme = self.preference.theme_id.theme();

        let header = row![
            text("Token Usage").size(28),
            horizontal_space(),
            button(text("Refresh").size(13))
                .style(style::action_button(scheme))
                .on_press_maybe((!self.token_usage.is_loading()).then_some(Message::RefreshTokenUsage)),
        ]
        .align_y(Alignment::Center);

        let body = loadable(&self.token_usage, |usage| self.token_usage_body(usage));

        scrollable(
            column![header, body]
                .spacing(METRICS.section_spacing)
                .width(Length::Fill),
        )
        .into()
    }

    fn token_usage_body<'a>(&self, usage: &'a TokenUsage) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();
        let muted = to_iced(scheme.gutter_text);

        let mut summary = column![
            text(format!("Total tokens: {}", usage.summary.total_tokens)).size(16),
            text(format!(
                "Estimated cost: ${:.4}",
                usage.summary.estimated_cost_usd
            ))
            .size(16),
        ]
        .spacing(6);
        for (model, tokens) in &usage.summary.model_breakdown {
            summary = summary.push(text(format!("{}: {} tokens", model, tokens)).size(13).color(muted));
        }

        let entries = usage.history.usage_history.iter().map(|entry| {
            row![
                text(entry.timestamp.as_str()).size(12).color(muted).width(200),
                text(entry.model.as_str()).size(12).width(180),
                text(entry.endpoint.as_str()).size(12).width(Length::Fill),
                text(format!(
                    "{} + {} = {}",
                    entry.prompt_tokens, entry.completion_tokens, entry.total_tokens
                ))
                .size(12)
                .font(Font::MONOSPACE),
            ]
            .spacing(12)
            .into()
        });

        let history: Element<'a, Message> = if usage.history.usage_history.is_empty() {
            text("No requests recorded yet.").size(13).color(muted).into()
        } else {
            Column::with_children(entries).spacing(4).into()
        };

        column![
            container(summary)
                .padding(16)
                .width(Length::Fill)
                .style(style::card(scheme)),
            text("History").size(20),
            history,
        ]
        .spacing(METRICS.section_spacing)
        .into()
    }
}
