use pylearn_client::{
    Chapter, Exercise, Feedback, Notes, RunTicket, TokenUsageHistory, TokenUsageSummary,
    TopicSummary,
};
use pylearn_core::{EditorSettings, Preference};

use crate::components::EditorView;

/// Which page is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Chapters,
    Topic(String),
    Exercise(String),
    TokenUsage,
}

/// State of something fetched from the backend.
#[derive(Debug, Clone, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// The two code editors of an exercise page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Main,
    Scratchbook,
}

impl EditorTab {
    pub fn label(self) -> &'static str {
        match self {
            EditorTab::Main => "Solution",
            EditorTab::Scratchbook => "Scratchbook",
        }
    }
}

/// Exercises of one topic.
#[derive(Debug, Clone)]
pub struct TopicPage {
    pub topic_id: String,
    pub title: String,
    pub chapter_title: Option<String>,
    pub exercises: Loadable<Vec<Exercise>>,
}

impl TopicPage {
    /// Finds the topic in the loaded chapters to get its titles early.
    pub fn new(topic_id: &str, chapters: &[Chapter]) -> Self {
        let found = chapters.iter().find_map(|chapter| {
            chapter
                .topics
                .iter()
                .find(|topic| topic.id == topic_id)
                .map(|topic: &TopicSummary| (chapter.title.clone(), topic.title.clone()))
        });

        let (chapter_title, title) = match found {
            Some((chapter, topic)) => (Some(chapter), topic),
            None => (None, topic_id.to_string()),
        };

        Self {
            topic_id: topic_id.to_string(),
            title,
            chapter_title,
            exercises: Loadable::Loading,
        }
    }
}

/// One exercise with its editors, feedback and notes.
pub struct ExercisePage {
    pub exercise_id: String,
    pub exercise: Loadable<Exercise>,
    /// Exercises of the same topic, for previous / next
    pub siblings: Vec<Exercise>,
    pub main: EditorView,
    pub scratchbook: EditorView,
    pub active_tab: EditorTab,
    pub feedback: Loadable<Feedback>,
    pub feedback_visible: bool,
    pub notes: Loadable<Notes>,
    pub notes_visible: bool,
    /// Which editor the pending run belongs to
    pub pending_run: Option<(EditorTab, RunTicket)>,
}

impl ExercisePage {
    pub fn new(
        exercise_id: &str,
        siblings: Vec<Exercise>,
        preference: Preference,
        settings: &EditorSettings,
    ) -> Self {
        Self {
            exercise_id: exercise_id.to_string(),
            exercise: Loadable::Loading,
            siblings,
            main: EditorView::new("", preference, settings.clone()),
            scratchbook: EditorView::new("", preference, settings.clone()),
            active_tab: EditorTab::Main,
            feedback: Loadable::Idle,
            feedback_visible: false,
            notes: Loadable::Idle,
            notes_visible: false,
            pending_run: None,
        }
    }

    pub fn editor(&self, tab: EditorTab) -> &EditorView {
        match tab {
            EditorTab::Main => &self.main,
            EditorTab::Scratchbook => &self.scratchbook,
        }
    }

    pub fn editor_mut(&mut self, tab: EditorTab) -> &mut EditorView {
        match tab {
            EditorTab::Main => &mut self.main,
            EditorTab::Scratchbook => &mut self.scratchbook,
        }
    }

    /// Position of this exercise among its siblings.
    pub fn sibling_index(&self) -> Option<usize> {
        self.siblings
            .iter()
            .position(|exercise| exercise.id == self.exercise_id)
    }

    pub fn previous_id(&self) -> Option<&str> {
        let index = self.sibling_index()?;
        index
            .checked_sub(1)
            .and_then(|i| self.siblings.get(i))
            .map(|exercise| exercise.id.as_str())
    }

    pub fn next_id(&self) -> Option<&str> {
        let index = self.sibling_index()?;
        self.siblings
            .get(index + 1)
            .map(|exercise| exercise.id.as_str())
    }
}

/// Token usage summary and history, fetched together.
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub summary: TokenUsageSummary,
    pub history: TokenUsageHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: &str) -> Exercise {
        Exercise {
            id: id.to_string(),
            title: id.to_uppercase(),
            ..Default::default()
        }
    }

    fn page(id: &str) -> ExercisePage {
        ExercisePage::new(
            id,
            vec![exercise("a"), exercise("b"), exercise("c")],
            Preference::default_for(pylearn_core::Appearance::Dark),
            &EditorSettings::default(),
        )
    }

    #[test]
    fn test_sibling_navigation() {
        let first = page("a");
        assert_eq!(first.previous_id(), None);
        assert_eq!(first.next_id(), Some("b"));

        let middle = page("b");
        assert_eq!(middle.previous_id(), Some("a"));
        assert_eq!(middle.next_id(), Some("c"));

        let last = page("c");
        assert_eq!(last.next_id(), None);

        let stray = page("zzz");
        assert_eq!(stray.previous_id(), None);
        assert_eq!(stray.next_id(), None);
    }

    #[test]
    fn test_topic_page_titles_from_chapters() {
        let chapters = vec![Chapter {
            id: "basics".into(),
            title: "Basics".into(),
            description: None,
            topics: vec![TopicSummary {
                id: "variables".into(),
                title: "Variables".into(),
                description: None,
            }],
        }];

        let known = TopicPage::new("variables", &chapters);
        assert_eq!(known.title, "Variables");
        assert_eq!(known.chapter_title.as_deref(), Some("Basics"));

        let unknown = TopicPage::new("loops", &chapters);
        assert_eq!(unknown.title, "loops");
        assert!(unknown.chapter_title.is_none());
    }
}
