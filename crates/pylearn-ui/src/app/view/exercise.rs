use iced::widget::{Column, Row, button, column, container, horizontal_space, row, scrollable, text};
use iced::{Alignment, Element, Font, Length};
use pylearn_client::{Exercise, Feedback};

use super::loadable;
use crate::app::{App, EditorTab, ExercisePage, Loadable, Message, Route};
use crate::style::{self, METRICS};
use crate::theme::to_iced;

impl App {
    pub fn view_exercise(&self) -> Element<'_, Message> {
        let Some(page) = &self.exercise else {
            return text("Loading...").size(14).into();
        };

        let Some(exercise) = page.exercise.loaded() else {
            return loadable(&page.exercise, |_| column![].into());
        };

        let details = scrollable(
            column![self.exercise_details(exercise), self.notes_panel(page)]
                .spacing(METRICS.section_spacing),
        )
        .width(Length::FillPortion(2));

        let workspace = column![
            self.editor_tabs(page),
            page.editor(page.active_tab)
                .view(self.config.ui.font_size)
                .map({
                    let tab = page.active_tab;
                    move |message| Message::Editor(tab, message)
                }),
            self.exercise_actions(page),
            page.editor(page.active_tab).view_output(),
            self.feedback_panel(page),
        ]
        .spacing(10)
        .width(Length::FillPortion(3))
        .height(Length::Fill);

        row![details, workspace]
            .spacing(METRICS.section_spacing + 8)
            .height(Length::Fill)
            .into()
    }

    fn exercise_details<'a>(&self, exercise: &'a Exercise) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();
        let muted = to_iced(scheme.gutter_text);

        let mut details = Column::new().spacing(10);

        let breadcrumb: Vec<&str> = [&exercise.chapter_title, &exercise.topic_title]
            .into_iter()
            .filter_map(|title| title.as_deref())
            .collect();
        if !breadcrumb.is_empty() {
            details = details.push(text(breadcrumb.join(" / ")).size(12).color(muted));
        }

        let mut title = row![text(exercise.title.as_str()).size(26)]
            .spacing(12)
            .align_y(Alignment::Center);
        if let Some(difficulty) = &exercise.difficulty {
            title = title.push(
                text(difficulty.as_str())
                    .size(13)
                    .color(to_iced(scheme.accent)),
            );
        }
        details = details.push(title);

        if let Some(description) = exercise.description.as_deref().filter(|s| !s.is_empty()) {
            details = details.push(text(description).size(14));
        }
        if let Some(instructions) = exercise.instructions.as_deref().filter(|s| !s.is_empty()) {
            details = details.push(text("Instructions").size(18));
            details = details.push(text(instructions).size(14));
        }
        if let Some(expected) = exercise.expected_output.as_deref().filter(|s| !s.is_empty()) {
            details = details.push(text("Expected output").size(18));
            details = details.push(
                container(text(expected).font(Font::MONOSPACE).size(13))
                    .padding(10)
                    .width(Length::Fill)
                    .style(style::output(scheme, false)),
            );
        }
        if let Some(hint) = exercise.hint.as_deref().filter(|s| !s.is_empty()) {
            details = details.push(text(format!("Hint: {}", hint)).size(13).color(muted));
        }

        details.into()
    }

    fn editor_tabs<'a>(&self, page: &'a ExercisePage) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();
        let tabs = [EditorTab::Main, EditorTab::Scratchbook].map(|tab| -> Element<'a, Message> {
            button(text(tab.label()).size(13))
                .padding([6, 14])
                .style(style::tab_button(scheme, page.active_tab == tab))
                .on_press(Message::SelectTab(tab))
                .into()
        });

        let run_keys: Vec<String> = self
            .settings
            .keymap
            .run_keys()
            .into_iter()
            .map(ToString::to_string)
            .collect();

        let mut bar = Row::with_children(tabs).spacing(2).align_y(Alignment::End);
        bar = bar.push(horizontal_space());
        if !run_keys.is_empty() {
            bar = bar.push(
                text(format!("{} to run", run_keys.join(" or ")))
                    .size(12)
                    .color(to_iced(scheme.gutter_text)),
            );
        }
        bar.into()
    }

    fn exercise_actions<'a>(&self, page: &'a ExercisePage) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();
        let editor = page.editor(page.active_tab);

        let run = button(text(if editor.running { "Running..." } else { "Run" }).size(13))
            .padding([6, 16])
            .style(style::action_button(scheme))
            .on_press_maybe((!editor.running).then_some(Message::Run));

        let reset = button(text("Reset").size(13))
            .padding([6, 12])
            .style(style::subtle_button(scheme))
            .on_press(Message::ResetCode);

        let mut actions = row![run, reset].spacing(8).align_y(Alignment::Center);

        if page.active_tab == EditorTab::Main {
            let submit_label = if page.feedback.is_loading() {
                "Getting feedback..."
            } else {
                "Submit for feedback"
            };
            actions = actions.push(
                button(text(submit_label).size(13))
                    .padding([6, 12])
                    .style(style::action_button(scheme))
                    .on_press_maybe((!page.feedback.is_loading()).then_some(Message::Submit)),
            );
        }

        if !matches!(page.feedback, Loadable::Idle) {
            let label = if page.feedback_visible {
                "Hide feedback"
            } else {
                "Show feedback"
            };
            actions = actions.push(
                button(text(label).size(13))
                    .padding([6, 12])
                    .style(style::subtle_button(scheme))
                    .on_press(Message::ToggleFeedback),
            );
        }

        let notes_label = if page.notes_visible { "Hide notes" } else { "Notes" };
        actions = actions.push(
            button(text(notes_label).size(13))
                .padding([6, 12])
                .style(style::subtle_button(scheme))
                .on_press(Message::ToggleNotes),
        );

        actions = actions.push(horizontal_space());
        for (label, target) in [("< Previous", page.previous_id()), ("Next >", page.next_id())] {
            actions = actions.push(
                button(text(label).size(13))
                    .padding([6, 12])
                    .style(style::subtle_button(scheme))
                    .on_press_maybe(
                        target.map(|id| Message::Navigate(Route::Exercise(id.to_string()))),
                    ),
            );
        }

        actions.into()
    }

    fn notes_panel<'a>(&self, page: &'a ExercisePage) -> Element<'a, Message> {
        if !page.notes_visible {
            return column![].into();
        }
        let scheme = self.preference.theme_id.theme();

        let body = loadable(&page.notes, |notes| {
            text(notes.markdown.as_str()).size(13).into()
        });

        container(column![text("Notes").size(18), body].spacing(8))
            .padding(14)
            .width(Length::Fill)
            .style(style::card(scheme))
            .into()
    }

    fn feedback_panel<'a>(&self, page: &'a ExercisePage) -> Element<'a, Message> {
        if !page.feedback_visible {
            return column![].into();
        }
        let scheme = self.preference.theme_id.theme();

        let body = loadable(&page.feedback, |feedback| self.feedback_body(feedback));

        container(scrollable(body))
            .padding(14)
            .width(Length::Fill)
            .max_height(METRICS.output_height * 1.5)
            .style(style::card(scheme))
            .into()
    }

    fn feedback_body<'a>(&self, feedback: &'a Feedback) -> Element<'a, Message> {
        let scheme = self.preference.theme_id.theme();
        let (verdict, color) = if feedback.is_correct() {
            ("Correct", scheme.syntax.string)
        } else {
            ("Not quite", scheme.error_text)
        };

        let mut body = column![
            text(verdict).size(20).color(to_iced(color)),
            text(feedback.overall_feedback.as_str()).size(14),
        ]
        .spacing(8);

        if !feedback.detailed_feedback.is_empty() {
            body = body.push(text(feedback.detailed_feedback.as_str()).size(13));
        }

        if !feedback.mistakes.is_empty() {
            body = body.push(text("Mistakes").size(16));
            for mistake in &feedback.mistakes {
                body = body.push(text(format!("- {}", mistake.description)).size(13));
                if !mistake.suggestion.is_empty() {
                    body = body.push(
                        text(format!("  Suggestion: {}", mistake.suggestion))
                            .size(12)
                            .color(to_iced(scheme.gutter_text)),
                    );
                }
            }
        }

        if !feedback.alternative_solutions.is_empty() {
            body = body.push(text("Alternative solutions").size(16));
            for solution in &feedback.alternative_solutions {
                body = body.push(
                    container(text(solution.as_str()).font(Font::MONOSPACE).size(12))
                        .padding(8)
                        .width(Length::Fill)
                        .style(style::output(scheme, false)),
                );
            }
        }

        body.into()
    }
}
