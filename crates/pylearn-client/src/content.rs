//! Read-only course content: chapters, topics, exercises and notes.
//!
//! Listing calls never fail. When the backend is down, answers with an
//! error, or sends something undecodable, the bundled content is returned
//! instead and tagged [`Source::Fallback`] so the shell can say so.

use crate::{ApiClient, ClientError, ClientResult, fallback, path_segment};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static YOUR_CODE_HERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#.*Your code here.*$").expect("placeholder pattern is valid")
});

static WRITE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#.*[Ww]rite.*code.*$").expect("placeholder pattern is valid")
});

/// Where a piece of content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Fallback,
}

/// Content plus its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Fetched<T> {
    fn remote(value: T) -> Self {
        Self {
            value,
            source: Source::Remote,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: Source::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<TopicSummary>,
}

/// One exercise as served by the backend.
///
/// Topic listings return the same shape, so there is a single type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub difficulty: Option<String>,
    pub hint: Option<String>,
    #[serde(rename = "starterCode", alias = "starter_code")]
    pub starter_code: Option<String>,
    #[serde(rename = "expectedOutput", alias = "expected_output")]
    pub expected_output: Option<String>,
    pub notebook_ref: Option<String>,
    pub topic_id: Option<String>,
    pub topic_title: Option<String>,
    pub chapter_id: Option<String>,
    pub chapter_title: Option<String>,
}

impl Exercise {
    /// Short text for exercise cards.
    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.instructions.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("No description available.")
    }

    /// Starter code with placeholder comments removed; empty when absent.
    pub fn cleaned_starter_code(&self) -> String {
        self.starter_code
            .as_deref()
            .map(clean_starter_code)
            .unwrap_or_default()
    }
}

/// Rendered notebook notes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notes {
    pub markdown: String,
}

/// Removes the first "Your code here" and the first "write ... code"
/// comment line. The line breaks around them stay.
pub fn clean_starter_code(code: &str) -> String {
    let first = YOUR_CODE_HERE.replace(code, "");
    WRITE_CODE.replace(&first, "").into_owned()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChapterPayload {
    Missing { error: String },
    Found(Chapter),
}

/// Course content endpoints.
#[derive(Debug, Clone)]
pub struct ContentClient {
    client: ApiClient,
}

impl ContentClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All chapters with their topics.
    pub async fn chapters(&self) -> Fetched<Vec<Chapter>> {
        match self.client.get_json::<Vec<Chapter>>("/chapters").await {
            Ok(chapters) => Fetched::remote(chapters),
            Err(err) => {
                tracing::warn!("Falling back to bundled chapters: {}", err);
                Fetched::fallback(fallback::chapters())
            }
        }
    }

    /// One chapter. A "not found" answer falls back like any other failure.
    pub async fn chapter(&self, chapter_id: &str) -> Fetched<Option<Chapter>> {
        match self.fetch_chapter(chapter_id).await {
            Ok(chapter) => Fetched::remote(Some(chapter)),
            Err(err) => {
                tracing::warn!("Falling back for chapter {}: {}", chapter_id, err);
                Fetched::fallback(fallback::chapter(chapter_id))
            }
        }
    }

    async fn fetch_chapter(&self, chapter_id: &str) -> ClientResult<Chapter> {
        let path = format!("/chapters/{}", path_segment(chapter_id));
        match self.client.get_json::<ChapterPayload>(&path).await? {
            ChapterPayload::Found(chapter) => Ok(chapter),
            ChapterPayload::Missing { error } => Err(ClientError::Backend(error)),
        }
    }

    /// Exercises of a topic, in course order.
    pub async fn topic_exercises(&self, topic_id: &str) -> Fetched<Vec<Exercise>> {
        let path = format!("/exercises/topics/{}", path_segment(topic_id));
        match self.client.get_json::<Vec<Exercise>>(&path).await {
            Ok(exercises) => Fetched::remote(exercises),
            Err(err) => {
                tracing::warn!("Falling back for topic {}: {}", topic_id, err);
                Fetched::fallback(fallback::topic_exercises(topic_id))
            }
        }
    }

    pub async fn exercise(&self, exercise_id: &str) -> Fetched<Exercise> {
        let path = format!("/exercises/exercise/{}", path_segment(exercise_id));
        match self.client.get_json::<Exercise>(&path).await {
            Ok(exercise) => Fetched::remote(exercise),
            Err(err) => {
                tracing::warn!("Falling back for exercise {}: {}", exercise_id, err);
                Fetched::fallback(fallback::exercise(exercise_id))
            }
        }
    }

    /// Notes for a notebook reference. No bundled notes exist, so this
    /// one reports failures.
    pub async fn notes(&self, notebook: &str) -> ClientResult<Notes> {
        let path = format!("/notes/{}", path_segment(notebook));
        self.client.get_json(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn client_for(router: Router) -> ContentClient {
        let base = testing::serve(router).await;
        ContentClient::new(ApiClient::new(base))
    }

    fn offline() -> ContentClient {
        ContentClient::new(ApiClient::new(testing::unreachable()))
    }

    #[test]
    fn test_clean_starter_code() {
        let code = "# Your code here\nx = 1\n# Write your code below\nprint(x)\n";
        assert_eq!(clean_starter_code(code), "\nx = 1\n\nprint(x)\n");
    }

    #[test]
    fn test_clean_starter_code_first_match_only() {
        let code = "# Your code here\n# Your code here\n";
        assert_eq!(clean_starter_code(code), "\n# Your code here\n");
    }

    #[test]
    fn test_clean_starter_code_keeps_real_code() {
        let code = "squares = [x**2 for x in range(1, 11)]";
        assert_eq!(clean_starter_code(code), code);
        // Not a comment line
        assert_eq!(clean_starter_code("s = 'write code'"), "s = 'write code'");
    }

    #[test]
    fn test_exercise_decodes_camel_case() {
        let exercise: Exercise = serde_json::from_value(json!({
            "id": "Chapter1_DataObjects_001",
            "title": "Exercise 1",
            "difficulty": "beginner",
            "starterCode": "# Your code here\n\n",
            "expectedOutput": "3",
            "notebook_ref": "Chapter1_DataObjects",
            "hint": null
        }))
        .unwrap();

        assert_eq!(exercise.starter_code.as_deref(), Some("# Your code here\n\n"));
        assert_eq!(exercise.expected_output.as_deref(), Some("3"));
        assert_eq!(exercise.cleaned_starter_code(), "\n\n");
        assert_eq!(exercise.summary(), "No description available.");
    }

    #[tokio::test]
    async fn test_chapters_remote() {
        let router = Router::new().route(
            "/api/chapters",
            get(|| async {
                Json(json!([{
                    "id": "Chapter1_DataObjects",
                    "title": "Data Objects",
                    "topics": [{ "id": "numbers", "title": "Numbers" }]
                }]))
            }),
        );
        let client = client_for(router).await;

        let fetched = client.chapters().await;
        assert_eq!(fetched.source, Source::Remote);
        assert_eq!(fetched.value.len(), 1);
        assert_eq!(fetched.value[0].topics[0].title, "Numbers");
    }

    #[tokio::test]
    async fn test_chapters_fallback_when_offline() {
        let fetched = offline().chapters().await;
        assert!(fetched.is_fallback());
        let titles: Vec<&str> = fetched.value.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Basics", "Data Structures"]);
    }

    #[tokio::test]
    async fn test_chapters_fallback_on_undecodable_body() {
        let router = Router::new().route("/api/chapters", get(|| async { "not json" }));
        let client = client_for(router).await;

        assert!(client.chapters().await.is_fallback());
    }

    #[tokio::test]
    async fn test_missing_chapter_body_is_an_error() {
        let router = Router::new().route(
            "/api/chapters/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({ "error": format!("Chapter not found: {id}") }))
            }),
        );
        let client = client_for(router).await;

        let fetched = client.chapter("nope").await;
        assert!(fetched.is_fallback());
        assert_eq!(fetched.value, None);

        let err = client.fetch_chapter("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Chapter not found: nope");
    }

    #[tokio::test]
    async fn test_topic_exercises_fallback() {
        let fetched = offline().topic_exercises("lists").await;
        assert!(fetched.is_fallback());
        let ids: Vec<&str> = fetched.value.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["list-basics", "list-methods", "list-slicing", "list-comprehension"]
        );
        assert_eq!(fetched.value[0].chapter_title.as_deref(), Some("Data Structures"));

        assert!(offline().topic_exercises("unknown").await.value.is_empty());
    }

    #[tokio::test]
    async fn test_exercise_not_found_falls_back() {
        let router = Router::new().route(
            "/api/exercises/exercise/:id",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "detail": "Exercise not found" })),
                )
            }),
        );
        let client = client_for(router).await;

        let fetched = client.exercise("list-slicing").await;
        assert!(fetched.is_fallback());
        assert_eq!(fetched.value.title, "List Slicing");

        let fetched = client.exercise("whatever").await;
        assert_eq!(fetched.value.id, "list-comprehension");
        assert_eq!(
            fetched.value.cleaned_starter_code(),
            "squares = [x**2 for x in range(1, 11)]"
        );
    }

    #[tokio::test]
    async fn test_notes() {
        let router = Router::new().route(
            "/api/notes/:name",
            get(|Path(name): Path<String>| async move {
                Json(json!({ "markdown": format!("<h1>{name}</h1>") }))
            }),
        );
        let client = client_for(router).await;

        let notes = client.notes("Chapter1_DataObjects").await.unwrap();
        assert_eq!(notes.markdown, "<h1>Chapter1_DataObjects</h1>");

        assert!(offline().notes("x").await.is_err());
    }

    #[tokio::test]
    async fn test_remote_exercise_list() {
        let router = Router::new().route(
            "/api/exercises/topics/:topic",
            get(|| async {
                Json(json!([
                    { "id": "numbers_001", "title": "Exercise 1" },
                    { "id": "numbers_002", "title": "Exercise 2" }
                ]))
            }),
        );
        let client = client_for(router).await;

        let fetched = client.topic_exercises("numbers").await;
        assert_eq!(fetched.source, Source::Remote);
        assert_eq!(fetched.value[1].id, "numbers_002");
    }
}
