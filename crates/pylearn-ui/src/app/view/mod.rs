pub mod chapters;
pub mod exercise;
pub mod tokens;
pub mod topic;

use iced::widget::{button, checkbox, column, container, horizontal_space, pick_list, row, text};
use iced::{Alignment, Element, Length};

use crate::app::{App, Loadable, Message, Route};
use crate::style::{self, METRICS};
use crate::theme::ThemeChoice;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let scheme = self.preference.theme_id.theme();

        let body = match &self.route {
            Route::Chapters => self.view_chapters(),
            Route::Topic(_) => self.view_topic(),
            Route::Exercise(_) => self.view_exercise(),
            Route::TokenUsage => self.view_token_usage(),
        };

        let mut content = column![self.view_toolbar()];
        if self.offline {
            content = content.push(self.view_banner(
                "Offline: showing bundled sample content. Start the backend or check --api-url.",
            ));
        }
        if let Some(status) = &self.status_message {
            content = content.push(
                row![
                    self.view_banner(status),
                    button(text("Dismiss").size(12))
                        .style(style::subtle_button(scheme))
                        .on_press(Message::DismissStatus),
                ]
                .spacing(8)
                .padding([4, METRICS.page_padding])
                .align_y(Alignment::Center),
            );
        }
        content = content.push(
            container(body)
                .padding(METRICS.page_padding)
                .width(Length::Fill)
                .height(Length::Fill),
        );

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::page(scheme))
            .into()
    }

    fn view_toolbar(&self) -> Element<'_, Message> {
        let scheme = self.preference.theme_id.theme();

        let mut nav = row![
            button(text("PyLearn").size(16))
                .style(style::subtle_button(scheme))
                .on_press(Message::Navigate(Route::Chapters)),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        if self.route != Route::Chapters {
            nav = nav.push(
                button(text("< Back").size(13))
                    .style(style::subtle_button(scheme))
                    .on_press(Message::Back),
            );
        }

        let theme_picker = pick_list(
            ThemeChoice::all(),
            Some(ThemeChoice(self.preference.theme_id)),
            Message::ThemeSelected,
        )
        .text_size(13);

        let recommendations = checkbox("Recommendations", self.preference.recommendations_enabled)
            .on_toggle(Message::RecommendationsToggled)
            .text_size(13);

        let usage = button(text("Token usage").size(13))
            .style(style::subtle_button(scheme))
            .on_press(Message::Navigate(Route::TokenUsage));

        container(
            row![
                nav,
                horizontal_space(),
                text("Theme").size(13),
                theme_picker,
                recommendations,
                usage,
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        )
        .padding([8, 16])
        .width(Length::Fill)
        .style(style::toolbar(scheme))
        .into()
    }

    fn view_banner<'a>(&self, message: &'a str) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();
        container(text(message).size(13))
            .padding([6, 12])
            .width(Length::Fill)
            .style(style::banner(scheme))
            .into()
    }
}

/// "Loading..." / error / content for anything fetched.
pub(crate) fn loadable<'a, T>(
    state: &'a Loadable<T>,
    loaded: impl FnOnce(&'a T) -> Element<'a, Message>,
) -> Element<'a, Message> {
    match state {
        Loadable::Idle => column![].into(),
        Loadable::Loading => text("Loading...").size(14).into(),
        Loadable::Failed(error) => text(error.as_str()).size(14).into(),
        Loadable::Loaded(value) => loaded(value),
    }
}
