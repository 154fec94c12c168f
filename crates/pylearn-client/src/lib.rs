//! # PyLearn Client
//!
//! Everything that talks to the learning platform backend: code execution,
//! course content, AI marking, token usage and the health check.
//!
//! All calls are plain JSON over HTTP. The backend is the only place code
//! runs or gets marked; this crate just shapes requests and responses.
//!
//! ```text
//!   ApiClient (base URL, reqwest::Client)
//!      ├── ExecutionBridge   POST /execute-code
//!      ├── ContentClient     GET  /chapters, /exercises/..., /notes/...
//!      ├── MarkingClient     POST /mark_exercise
//!      ├── TokenClient       GET  /token_usage, /token_usage/summary
//!      └── health()          GET  /health
//! ```

pub mod autodisplay;
pub mod content;
pub mod execution;
mod fallback;
pub mod health;
pub mod marking;
pub mod tokens;

pub use autodisplay::auto_display;
pub use content::{
    Chapter, ContentClient, Exercise, Fetched, Notes, Source, TopicSummary, clean_starter_code,
};
pub use execution::{ExecutionBridge, ExecutionOptions, ExecutionResult, RunTicket};
pub use health::Health;
pub use marking::{
    Correctness, Feedback, MarkMetadata, MarkRequest, MarkResponse, MarkingClient, Mistake,
};
pub use tokens::{TokenClient, TokenUsageEntry, TokenUsageHistory, TokenUsageSummary};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network / reqwest-level error, including undecodable bodies.
    #[error("Failed to connect to the server: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from the backend.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose payload reports an error.
    #[error("{0}")]
    Backend(String),
}

impl ClientError {
    /// The HTTP status, when the backend answered with one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Backend(_) => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Shared HTTP plumbing: one `reqwest::Client` and the base URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client, optionally bounding every request.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // Fall back to reqwest defaults if builder creation fails for any reason.
        let http = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `/chapters`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }

    response.json::<T>().await.map_err(ClientError::from)
}

/// Everything outside the URL unreserved set.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes one path segment.
pub(crate) fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}
