//! AI feedback on a submitted solution.

use crate::{ApiClient, ClientResult, Exercise};
use serde::{Deserialize, Serialize};

/// Verdict of the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Correctness {
    Correct,
    Incorrect,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub description: String,
    #[serde(default)]
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub correctness: Correctness,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub detailed_feedback: String,
    #[serde(default)]
    pub alternative_solutions: Vec<String>,
    #[serde(default)]
    pub mistakes: Vec<Mistake>,
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        self.correctness == Correctness::Correct
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkRequest {
    pub exercise_id: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MarkMetadata>,
}

impl MarkRequest {
    /// Builds a request carrying the exercise's question and expected output.
    pub fn for_exercise(exercise: &Exercise, code: impl Into<String>) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            code: code.into(),
            expected_output: exercise.expected_output.clone(),
            question: exercise.instructions.clone(),
            metadata: Some(MarkMetadata {
                title: exercise.title.clone(),
                difficulty: exercise.difficulty.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkResponse {
    #[serde(default)]
    pub id: Option<i64>,
    pub exercise_id: String,
    pub feedback: Feedback,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct MarkingClient {
    client: ApiClient,
}

impl MarkingClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submits code for marking. Errors are for the caller to show.
    pub async fn mark(&self, request: &MarkRequest) -> ClientResult<MarkResponse> {
        tracing::info!("Requesting feedback for {}", request.exercise_id);
        self.client.post_json("/mark_exercise", request).await
    }
}
