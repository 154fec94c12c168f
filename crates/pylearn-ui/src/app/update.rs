use iced::Task;
use pylearn_client::{MarkRequest, TokenClient};
use pylearn_core::EditorAction;

use super::{App, EditorTab, ExercisePage, Loadable, Message, Route, TokenUsage, TopicPage};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => return self.navigate(route),

            Message::Back => {
                let route = match &self.route {
                    Route::Exercise(_) => match self.current_topic_id() {
                        Some(topic_id) => Route::Topic(topic_id),
                        None => Route::Chapters,
                    },
                    _ => Route::Chapters,
                };
                return self.navigate(route);
            }

            Message::ChaptersLoaded(fetched) => {
                self.offline |= fetched.is_fallback();
                self.chapters = Loadable::Loaded(fetched.value);
            }

            Message::ChapterLoaded(fetched) => {
                self.offline |= fetched.is_fallback();
                if let (Some(chapter), Some(topic)) = (fetched.value, self.topic.as_mut()) {
                    if let Some(summary) = chapter.topics.iter().find(|t| t.id == topic.topic_id) {
                        topic.title = summary.title.clone();
                        topic.chapter_title = Some(chapter.title.clone());
                    }
                }
            }

            Message::TopicLoaded(topic_id, fetched) => {
                self.offline |= fetched.is_fallback();
                match self.topic.as_mut() {
                    Some(topic) if topic.topic_id == topic_id => {
                        topic.exercises = Loadable::Loaded(fetched.value);
                    }
                    _ => tracing::debug!("Dropping exercises of topic {} no longer shown", topic_id),
                }
            }

            Message::ExerciseLoaded(exercise_id, fetched) => {
                self.offline |= fetched.is_fallback();
                let content = self.content.clone();
                let Some(page) = self.exercise_page(&exercise_id) else {
                    return Task::none();
                };
                let exercise = fetched.value;
                page.main.reset(&exercise.cleaned_starter_code());

                let siblings_task = match &exercise.topic_id {
                    Some(topic_id) if page.siblings.is_empty() => {
                        let topic_id = topic_id.clone();
                        let id = exercise_id.clone();
                        Task::perform(
                            async move { content.topic_exercises(&topic_id).await },
                            move |fetched| Message::SiblingsLoaded(id.clone(), fetched),
                        )
                    }
                    _ => Task::none(),
                };
                page.exercise = Loadable::Loaded(exercise);
                return siblings_task;
            }

            Message::SiblingsLoaded(exercise_id, fetched) => {
                if let Some(page) = self.exercise_page(&exercise_id) {
                    page.siblings = fetched.value;
                }
            }

            Message::Editor(tab, editor_message) => {
                let Some(page) = self.exercise.as_mut() else {
                    return Task::none();
                };
                if page.editor_mut(tab).update(editor_message) {
                    return self.run(tab);
                }
            }

            Message::SelectTab(tab) => {
                if let Some(page) = self.exercise.as_mut() {
                    page.active_tab = tab;
                }
            }

            Message::Run => {
                if let Some(tab) = self.exercise.as_ref().map(|page| page.active_tab) {
                    return self.run(tab);
                }
            }

            Message::Executed(tab, ticket, result) => {
                if !self.bridge.is_current(ticket) {
                    tracing::debug!("Dropping result of superseded run {:?}", ticket);
                    return Task::none();
                }
                if let Some(page) = self.exercise.as_mut() {
                    if page.pending_run == Some((tab, ticket)) {
                        page.pending_run = None;
                        let editor = page.editor_mut(tab);
                        editor.running = false;
                        editor.output = Some(result);
                    }
                }
            }

            Message::ResetCode => {
                if let Some(page) = self.exercise.as_mut() {
                    let text = match page.active_tab {
                        EditorTab::Main => page
                            .exercise
                            .loaded()
                            .map(|exercise| exercise.cleaned_starter_code())
                            .unwrap_or_default(),
                        EditorTab::Scratchbook => String::new(),
                    };
                    let tab = page.active_tab;
                    page.editor_mut(tab).reset(&text);
                    if page.pending_run.is_some_and(|(pending, _)| pending == tab) {
                        page.pending_run = None;
                    }
                }
            }

            Message::Submit => return self.submit(),

            Message::Marked(exercise_id, result) => {
                let failed = result.is_err();
                let Some(page) = self.exercise_page(&exercise_id) else {
                    return Task::none();
                };
                page.feedback = match result {
                    Ok(response) => Loadable::Loaded(response.feedback),
                    Err(e) => {
                        tracing::warn!("Marking failed: {}", e);
                        Loadable::Failed(e)
                    }
                };
                if failed {
                    self.status_message = Some("Could not get feedback from the server".to_string());
                }
            }

            Message::ToggleFeedback => {
                if let Some(page) = self.exercise.as_mut() {
                    page.feedback_visible = !page.feedback_visible;
                }
            }

            Message::ToggleNotes => return self.toggle_notes(),

            Message::NotesLoaded(exercise_id, result) => {
                if let Some(page) = self.exercise_page(&exercise_id) {
                    page.notes = match result {
                        Ok(notes) => Loadable::Loaded(notes),
                        Err(e) => {
                            tracing::warn!("Notes unavailable: {}", e);
                            Loadable::Failed(format!("Failed to load notes: {}", e))
                        }
                    };
                }
            }

            Message::RefreshTokenUsage => return self.load_token_usage(),

            Message::TokenUsageLoaded(result) => {
                self.token_usage = match result {
                    Ok(usage) => Loadable::Loaded(usage),
                    Err(e) => {
                        tracing::warn!("Token usage unavailable: {}", e);
                        Loadable::Failed(e)
                    }
                };
            }

            Message::ThemeSelected(choice) => {
                self.preference.theme_id = choice.0;
                self.apply_preference();
            }

            Message::RecommendationsToggled(enabled) => {
                self.preference.recommendations_enabled = enabled;
                self.apply_preference();
            }

            Message::GlobalKey(press) => {
                let is_run = self.settings.keymap.action(&press) == Some(EditorAction::Run);
                if is_run && matches!(self.route, Route::Exercise(_)) {
                    return self.update(Message::Run);
                }
            }

            Message::DismissStatus => {
                self.status_message = None;
            }
        }
        Task::none()
    }

    // ==================== Navigation ====================

    fn navigate(&mut self, route: Route) -> Task<Message> {
        tracing::debug!("Navigating to {:?}", route);
        let siblings = self.sibling_exercises();
        let chapter_id = self.current_chapter_id();

        // Editors live only as long as their page.
        if !matches!(route, Route::Exercise(_)) {
            self.exercise = None;
        }
        self.route = route.clone();

        match route {
            Route::Chapters => {
                if matches!(self.chapters, Loadable::Loaded(_) | Loadable::Loading) {
                    Task::none()
                } else {
                    self.load_chapters()
                }
            }
            Route::Topic(topic_id) => self.open_topic(topic_id, chapter_id),
            Route::Exercise(exercise_id) => {
                self.exercise = Some(ExercisePage::new(
                    &exercise_id,
                    siblings,
                    self.preference,
                    &self.settings,
                ));
                let content = self.content.clone();
                let id = exercise_id.clone();
                Task::perform(
                    async move { content.exercise(&exercise_id).await },
                    move |fetched| Message::ExerciseLoaded(id.clone(), fetched),
                )
            }
            Route::TokenUsage => self.load_token_usage(),
        }
    }

    pub(crate) fn load_chapters(&mut self) -> Task<Message> {
        self.chapters = Loadable::Loading;
        let content = self.content.clone();
        Task::perform(
            async move { content.chapters().await },
            Message::ChaptersLoaded,
        )
    }

    fn open_topic(&mut self, topic_id: String, chapter_id: Option<String>) -> Task<Message> {
        let chapters = self.chapters.loaded().map(Vec::as_slice).unwrap_or_default();
        let page = TopicPage::new(&topic_id, chapters);
        let needs_titles = page.chapter_title.is_none();
        self.topic = Some(page);

        let content = self.content.clone();
        let id = topic_id.clone();
        let exercises = Task::perform(
            async move { content.topic_exercises(&topic_id).await },
            move |fetched| Message::TopicLoaded(id.clone(), fetched),
        );

        match chapter_id {
            Some(chapter_id) if needs_titles => {
                let content = self.content.clone();
                let chapter = Task::perform(
                    async move { content.chapter(&chapter_id).await },
                    Message::ChapterLoaded,
                );
                Task::batch([exercises, chapter])
            }
            _ => exercises,
        }
    }

    fn load_token_usage(&mut self) -> Task<Message> {
        self.token_usage = Loadable::Loading;
        Task::perform(fetch_token_usage(self.tokens.clone()), Message::TokenUsageLoaded)
    }

    /// Exercises to offer as previous / next on the next exercise page.
    fn sibling_exercises(&self) -> Vec<pylearn_client::Exercise> {
        if let Some(page) = &self.exercise {
            if !page.siblings.is_empty() {
                return page.siblings.clone();
            }
        }
        self.topic
            .as_ref()
            .and_then(|topic| topic.exercises.loaded())
            .cloned()
            .unwrap_or_default()
    }

    fn current_topic_id(&self) -> Option<String> {
        self.exercise
            .as_ref()
            .and_then(|page| page.exercise.loaded())
            .and_then(|exercise| exercise.topic_id.clone())
            .or_else(|| self.topic.as_ref().map(|topic| topic.topic_id.clone()))
    }

    fn current_chapter_id(&self) -> Option<String> {
        self.exercise
            .as_ref()
            .and_then(|page| page.exercise.loaded())
            .and_then(|exercise| exercise.chapter_id.clone())
    }

    fn exercise_page(&mut self, exercise_id: &str) -> Option<&mut ExercisePage> {
        self.exercise
            .as_mut()
            .filter(|page| page.exercise_id == exercise_id)
    }

    // ==================== Exercise actions ====================

    /// Runs the code of one editor. An older pending run is superseded.
    fn run(&mut self, tab: EditorTab) -> Task<Message> {
        let Some(page) = self.exercise.as_mut() else {
            return Task::none();
        };

        let code = page.editor(tab).text();
        let ticket = self.bridge.begin();
        page.main.running = false;
        page.scratchbook.running = false;
        page.editor_mut(tab).running = true;
        page.pending_run = Some((tab, ticket));

        let bridge = self.bridge.clone();
        Task::perform(
            async move { bridge.execute(&code).await },
            move |result| Message::Executed(tab, ticket, result),
        )
    }

    fn submit(&mut self) -> Task<Message> {
        let Some(page) = self.exercise.as_mut() else {
            return Task::none();
        };
        let Some(exercise) = page.exercise.loaded() else {
            return Task::none();
        };
        if page.feedback.is_loading() {
            return Task::none();
        }

        let request = MarkRequest::for_exercise(exercise, page.main.text());
        page.feedback = Loadable::Loading;
        page.feedback_visible = true;

        let marking = self.marking.clone();
        let id = page.exercise_id.clone();
        Task::perform(
            async move { marking.mark(&request).await.map_err(|e| e.to_string()) },
            move |result| Message::Marked(id.clone(), result),
        )
    }

    fn toggle_notes(&mut self) -> Task<Message> {
        let Some(page) = self.exercise.as_mut() else {
            return Task::none();
        };
        page.notes_visible = !page.notes_visible;
        if !page.notes_visible || matches!(page.notes, Loadable::Loaded(_) | Loadable::Loading) {
            return Task::none();
        }

        let notebook = page
            .exercise
            .loaded()
            .and_then(|exercise| exercise.notebook_ref.clone())
            .filter(|notebook| !notebook.is_empty());
        let Some(notebook) = notebook else {
            page.notes = Loadable::Failed("No notes available for this exercise".to_string());
            return Task::none();
        };

        page.notes = Loadable::Loading;
        let content = self.content.clone();
        let id = page.exercise_id.clone();
        Task::perform(
            async move { content.notes(&notebook).await.map_err(|e| e.to_string()) },
            move |result| Message::NotesLoaded(id.clone(), result),
        )
    }

    // ==================== Preferences ====================

    fn apply_preference(&mut self) {
        self.prefs.save(&self.preference);
        if let Some(page) = self.exercise.as_mut() {
            page.main.set_preference(self.preference);
            page.scratchbook.set_preference(self.preference);
        }
    }
}

async fn fetch_token_usage(client: TokenClient) -> Result<TokenUsage, String> {
    let summary = client.summary().await.map_err(|e| e.to_string())?;
    let history = client.history().await.map_err(|e| e.to_string())?;
    Ok(TokenUsage { summary, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeChoice;
    use pylearn_client::{Exercise, ExecutionResult, Fetched, Source};
    use pylearn_core::{Appearance, Config, Key, KeyPress, MemoryPreferenceStore, Modifiers, ThemeId};

    fn app() -> App {
        let mut config = Config::default();
        config.api.base_url = "http://127.0.0.1:9/api".to_string();
        let store = Box::new(MemoryPreferenceStore::new(Appearance::Dark));
        let (app, _) = App::with_store(config, store);
        app
    }

    fn exercise(id: &str) -> Exercise {
        Exercise {
            id: id.to_string(),
            title: "Variables".to_string(),
            starter_code: Some("# Your code here\nx = 1".to_string()),
            topic_id: Some("variables".to_string()),
            ..Default::default()
        }
    }

    fn open_exercise(app: &mut App, id: &str, source: Source) {
        let _ = app.update(Message::Navigate(Route::Exercise(id.to_string())));
        let _ = app.update(Message::ExerciseLoaded(
            id.to_string(),
            Fetched {
                value: exercise(id),
                source,
            },
        ));
    }

    #[test]
    fn test_starts_on_chapters_loading() {
        let app = app();
        assert_eq!(app.route, Route::Chapters);
        assert!(app.chapters.is_loading());
        assert_eq!(app.title(), "PyLearn");
    }

    #[test]
    fn test_loaded_exercise_fills_editor() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);

        let page = app.exercise.as_ref().unwrap();
        assert_eq!(page.main.text(), "\nx = 1");
        assert_eq!(page.scratchbook.text(), "");
        assert!(!app.offline);
        assert_eq!(app.title(), "Variables - PyLearn");
    }

    #[test]
    fn test_fallback_content_sets_offline() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Fallback);
        assert!(app.offline);
    }

    #[test]
    fn test_result_for_other_exercise_ignored() {
        let mut app = app();
        let _ = app.update(Message::Navigate(Route::Exercise("ex2".to_string())));
        let _ = app.update(Message::ExerciseLoaded(
            "ex1".to_string(),
            Fetched {
                value: exercise("ex1"),
                source: Source::Remote,
            },
        ));
        assert!(app.exercise.as_ref().unwrap().exercise.is_loading());
    }

    #[test]
    fn test_stale_run_result_dropped() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);

        let _ = app.update(Message::Run);
        let (_, first) = app.exercise.as_ref().unwrap().pending_run.unwrap();
        let _ = app.update(Message::Run);
        let (_, second) = app.exercise.as_ref().unwrap().pending_run.unwrap();

        let _ = app.update(Message::Executed(
            EditorTab::Main,
            first,
            ExecutionResult::Success("old".into()),
        ));
        let page = app.exercise.as_ref().unwrap();
        assert!(page.main.output.is_none());
        assert!(page.main.running);

        let _ = app.update(Message::Executed(
            EditorTab::Main,
            second,
            ExecutionResult::Success("new".into()),
        ));
        let page = app.exercise.as_ref().unwrap();
        assert_eq!(page.main.output, Some(ExecutionResult::Success("new".into())));
        assert!(!page.main.running);
    }

    #[test]
    fn test_reset_during_run_clears_running() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);

        let _ = app.update(Message::Run);
        let (tab, ticket) = app.exercise.as_ref().unwrap().pending_run.unwrap();
        let _ = app.update(Message::ResetCode);

        let page = app.exercise.as_ref().unwrap();
        assert!(page.pending_run.is_none());
        assert!(!page.main.running);

        let _ = app.update(Message::Executed(tab, ticket, ExecutionResult::Success("late".into())));
        let page = app.exercise.as_ref().unwrap();
        assert!(!page.main.running);
        assert!(page.main.output.is_none());
        assert_eq!(page.main.text(), "\nx = 1");
    }

    #[test]
    fn test_global_run_key_on_exercise() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);

        let _ = app.update(Message::GlobalKey(KeyPress::plain(Key::Enter)));
        assert!(app.exercise.as_ref().unwrap().pending_run.is_none());

        let _ = app.update(Message::GlobalKey(KeyPress::new(Key::Enter, Modifiers::SHIFT)));
        let page = app.exercise.as_ref().unwrap();
        let (tab, _) = page.pending_run.unwrap();
        assert_eq!(tab, EditorTab::Main);
        assert!(page.main.running);
    }

    #[test]
    fn test_global_run_key_ignored_off_exercise() {
        let mut app = app();
        let _ = app.update(Message::GlobalKey(KeyPress::new(Key::Enter, Modifiers::SHIFT)));

        assert_eq!(app.route, Route::Chapters);
        assert!(app.exercise.is_none());
        assert!(app.chapters.is_loading());
    }

    #[test]
    fn test_scratchbook_run_leaves_main_output() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);
        let _ = app.update(Message::SelectTab(EditorTab::Scratchbook));
        let _ = app.update(Message::Run);

        let (tab, ticket) = app.exercise.as_ref().unwrap().pending_run.unwrap();
        assert_eq!(tab, EditorTab::Scratchbook);
        let _ = app.update(Message::Executed(tab, ticket, ExecutionResult::Failure("boom".into())));

        let page = app.exercise.as_ref().unwrap();
        assert!(page.main.output.is_none());
        assert!(page.scratchbook.output.as_ref().unwrap().is_failure());
    }

    #[test]
    fn test_theme_change_saved_and_applied() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);
        let _ = app.update(Message::ThemeSelected(ThemeChoice(ThemeId::Nord)));
        let _ = app.update(Message::RecommendationsToggled(false));

        let stored = app.prefs.load();
        assert_eq!(stored.theme_id, ThemeId::Nord);
        assert!(!stored.recommendations_enabled);

        let page = app.exercise.as_ref().unwrap();
        assert_eq!(page.main.core().theme_id(), ThemeId::Nord);
        assert!(!page.scratchbook.core().recommendations_enabled());
        assert_eq!(page.main.text(), "\nx = 1");
    }

    #[test]
    fn test_back_from_exercise_goes_to_topic() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);
        let _ = app.update(Message::Back);

        assert_eq!(app.route, Route::Topic("variables".to_string()));
        assert!(app.exercise.is_none());
        assert!(app.topic.as_ref().unwrap().exercises.is_loading());
    }

    #[test]
    fn test_notes_without_reference() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);
        let _ = app.update(Message::ToggleNotes);

        let page = app.exercise.as_ref().unwrap();
        assert!(page.notes_visible);
        assert!(matches!(&page.notes, Loadable::Failed(msg) if msg.contains("No notes")));
    }

    #[test]
    fn test_marking_failure_reported() {
        let mut app = app();
        open_exercise(&mut app, "ex1", Source::Remote);
        let _ = app.update(Message::Submit);
        assert!(app.exercise.as_ref().unwrap().feedback.is_loading());

        let _ = app.update(Message::Marked("ex1".to_string(), Err("refused".to_string())));
        let page = app.exercise.as_ref().unwrap();
        assert!(matches!(page.feedback, Loadable::Failed(_)));
        assert!(app.status_message.is_some());
    }
}
