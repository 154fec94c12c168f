use iced::widget::{Column, Row, button, column, scrollable, text};
use iced::{Element, Length};
use pylearn_client::Exercise;

use super::loadable;
use crate::app::{App, Message, Route};
use crate::style::{self, METRICS};
use crate::theme::to_iced;

impl App {
    pub fn view_topic(&self) -> Element<'_, Message> {
        let Some(topic) = &self.topic else {
            return text("Loading...").size(14).into();
        };
        let scheme = self.preference.theme_id.theme();

        let mut header = column![text(topic.title.as_str()).size(28)].spacing(4);
        if let Some(chapter) = &topic.chapter_title {
            header = header.push(
                text(chapter.as_str())
                    .size(14)
                    .color(to_iced(scheme.gutter_text)),
            );
        }

        let body = loadable(&topic.exercises, |exercises| {
            if exercises.is_empty() {
                return text("No exercises in this topic yet.").size(14).into();
            }
            let cards = exercises
                .iter()
                .enumerate()
                .map(|(index, exercise)| self.exercise_card(index, exercise));
            Column::with_children(cards).spacing(10).into()
        });

        scrollable(
            column![header, body]
                .spacing(METRICS.section_spacing)
                .width(Length::Fill),
        )
        .into()
    }

    fn exercise_card<'a>(&self, index: usize, exercise: &'a Exercise) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();

        let mut title = Row::new()
            .spacing(10)
            .push(text(format!("{}. {}", index + 1, exercise.title)).size(16));
        if let Some(difficulty) = &exercise.difficulty {
            title = title.push(
                text(difficulty.as_str())
                    .size(12)
                    .color(to_iced(scheme.accent)),
            );
        }

        button(
            column![
                title,
                text(exercise.summary())
                    .size(13)
                    .color(to_iced(scheme.gutter_text)),
            ]
            .spacing(4),
        )
        .width(Length::Fill)
        .padding(12)
        .style(style::subtle_button(scheme))
        .on_press(Message::Navigate(Route::Exercise(exercise.id.clone())))
        .into()
    }
}
