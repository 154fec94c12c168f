use iced::{Subscription, Task, keyboard};
use pylearn_client::{
    ApiClient, Chapter, ContentClient, ExecutionBridge, ExecutionOptions, MarkingClient,
    TokenClient,
};
use pylearn_core::{Config, EditorSettings, Preference, PreferenceStore, prefs};
use std::time::Duration;

pub mod messages;
pub mod types;
pub mod update;
pub mod view;

pub use messages::*;
pub use types::*;

use crate::components::key_press_from_iced;

/// Startup parameters handed over by the binary.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub config: Config,
}

pub struct App {
    pub config: Config,
    pub settings: EditorSettings,
    pub content: ContentClient,
    pub bridge: ExecutionBridge,
    pub marking: MarkingClient,
    pub tokens: TokenClient,
    pub prefs: Box<dyn PreferenceStore>,
    pub preference: Preference,
    pub route: Route,
    pub chapters: Loadable<Vec<Chapter>>,
    pub topic: Option<TopicPage>,
    pub exercise: Option<ExercisePage>,
    pub token_usage: Loadable<TokenUsage>,
    /// Some content on screen is bundled fallback content
    pub offline: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let prefs = prefs::open_default(flags.config.ui.appearance);
        Self::with_store(flags.config, prefs)
    }

    /// Builds the app around an explicit preference store.
    pub fn with_store(config: Config, prefs: Box<dyn PreferenceStore>) -> (Self, Task<Message>) {
        let api = ApiClient::with_timeout(
            config.api.base_url.clone(),
            config.api.request_timeout_secs.map(Duration::from_secs),
        );
        let bridge = ExecutionBridge::with_options(
            api.clone(),
            ExecutionOptions {
                execute_path: config.api.execute_path.clone(),
                auto_display: config.api.auto_display,
            },
        );
        let preference = prefs.load();
        tracing::info!(
            "Using backend {} with theme {}",
            api.base_url(),
            preference.theme_id
        );

        let mut app = Self {
            settings: EditorSettings::from_config(&config),
            content: ContentClient::new(api.clone()),
            bridge,
            marking: MarkingClient::new(api.clone()),
            tokens: TokenClient::new(api),
            prefs,
            preference,
            route: Route::Chapters,
            chapters: Loadable::Idle,
            topic: None,
            exercise: None,
            token_usage: Loadable::Idle,
            offline: false,
            status_message: None,
            config,
        };
        let task = app.load_chapters();
        (app, task)
    }

    pub fn title(&self) -> String {
        let page = match &self.route {
            Route::Chapters => None,
            Route::Topic(_) => self.topic.as_ref().map(|topic| topic.title.clone()),
            Route::Exercise(_) => self
                .exercise
                .as_ref()
                .and_then(|page| page.exercise.loaded())
                .map(|exercise| exercise.title.clone()),
            Route::TokenUsage => Some("Token Usage".to_string()),
        };

        match page {
            Some(page) => format!("{} - PyLearn", page),
            None => "PyLearn".to_string(),
        }
    }

    pub fn theme(&self) -> iced::Theme {
        crate::theme::app_theme(self.preference.theme_id.theme())
    }

    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, modifiers| {
            key_press_from_iced(&key, modifiers).map(Message::GlobalKey)
        })
    }
}

pub fn run(flags: Flags) -> iced::Result {
    let window = iced::Size::new(flags.config.ui.window_width, flags.config.ui.window_height);
    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .window_size(window)
        .theme(App::theme)
        .antialiasing(true)
        .run_with(move || App::new(flags))
}
