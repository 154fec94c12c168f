use pylearn_client::{
    Chapter, Exercise, ExecutionResult, Fetched, MarkResponse, Notes, RunTicket,
};
use pylearn_core::KeyPress;

use crate::app::types::{EditorTab, Route, TokenUsage};
use crate::components::EditorMessage;
use crate::theme::ThemeChoice;

#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    Navigate(Route),
    Back,

    // Content
    ChaptersLoaded(Fetched<Vec<Chapter>>),
    ChapterLoaded(Fetched<Option<Chapter>>),
    TopicLoaded(String, Fetched<Vec<Exercise>>),
    ExerciseLoaded(String, Fetched<Exercise>),
    SiblingsLoaded(String, Fetched<Vec<Exercise>>),

    // Exercise page
    Editor(EditorTab, EditorMessage),
    SelectTab(EditorTab),
    Run,
    Executed(EditorTab, RunTicket, ExecutionResult),
    ResetCode,
    Submit,
    Marked(String, Result<MarkResponse, String>),
    ToggleFeedback,
    ToggleNotes,
    NotesLoaded(String, Result<Notes, String>),

    // Token usage
    RefreshTokenUsage,
    TokenUsageLoaded(Result<TokenUsage, String>),

    // Preferences
    ThemeSelected(ThemeChoice),
    RecommendationsToggled(bool),

    // Keyboard outside the editor
    GlobalKey(KeyPress),

    DismissStatus,
}
