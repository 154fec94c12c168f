use iced::widget::{Column, button, column, container, scrollable, text};
use iced::{Element, Length};
use pylearn_client::Chapter;

use super::loadable;
use crate::app::{App, Message, Route};
use crate::style::{self, METRICS};
use crate::theme::to_iced;

impl App {
    pub fn view_chapters(&self) -> Element<'_, Message> {
        let body = loadable(&self.chapters, |chapters| {
            if chapters.is_empty() {
                return text("No chapters available.").size(14).into();
            }
            let cards = chapters.iter().map(|chapter| self.chapter_card(chapter));
            Column::with_children(cards)
                .spacing(METRICS.section_spacing)
                .into()
        });

        scrollable(
            column![text("Chapters").size(28), body]
                .spacing(METRICS.section_spacing)
                .width(Length::Fill),
        )
        .into()
    }

    fn chapter_card<'a>(&self, chapter: &'a Chapter) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();

        let mut card = column![text(chapter.title.as_str()).size(20)].spacing(8);
        if let Some(description) = chapter.description.as_deref().filter(|s| !s.is_empty()) {
            card = card.push(
                text(description)
                    .size(13)
                    .color(to_iced(scheme.gutter_text)),
            );
        }

        let topics = chapter.topics.iter().map(|topic| {
            button(
                column![
                    text(topic.title.as_str()).size(15),
                    text(topic.description.as_deref().unwrap_or_default())
                        .size(12)
                        .color(to_iced(scheme.gutter_text)),
                ]
                .spacing(2),
            )
            .width(Length::Fill)
            .padding([8, 12])
            .style(style::subtle_button(scheme))
            .on_press(Message::Navigate(Route::Topic(topic.id.clone())))
            .into()
        });
        card = card.push(Column::with_children(topics).spacing(6));

        container(card)
            .padding(16)
            .width(Length::Fill)
            .style(style::card(scheme))
            .into()
    }
}
