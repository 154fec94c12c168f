//! Remote code execution.
//!
//! The bridge never fails: every outcome, including transport errors, is
//! folded into an [`ExecutionResult`] the output panel can show as-is.

use crate::{ApiClient, ClientError, auto_display};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shown when a run succeeds without printing anything.
pub const NO_OUTPUT: &str = "Code executed successfully (no output)";

/// Outcome of one execution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Success(String),
    Failure(String),
}

impl ExecutionResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failure(_))
    }

    /// The text to display, whichever way the run went.
    pub fn text(&self) -> &str {
        match self {
            ExecutionResult::Success(text) | ExecutionResult::Failure(text) => text,
        }
    }
}

/// Knobs for the execution endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Endpoint path under the API base, `/execute-code` by default.
    pub execute_path: String,
    /// Rewrite a trailing bare name into `print(name)` before sending.
    pub auto_display: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            execute_path: "/execute-code".to_string(),
            auto_display: true,
        }
    }
}

/// Identifies one run so late responses can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunTicket(u64);

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
    // Legacy `/execute_code` payload
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    jupyter_display: bool,
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    expression_value: Option<serde_json::Value>,
}

/// Sends code to the backend and maps the response for display.
///
/// Clones share the run generation counter.
#[derive(Debug, Clone)]
pub struct ExecutionBridge {
    client: ApiClient,
    options: ExecutionOptions,
    generation: Arc<AtomicU64>,
}

impl ExecutionBridge {
    pub fn new(client: ApiClient) -> Self {
        Self::with_options(client, ExecutionOptions::default())
    }

    pub fn with_options(client: ApiClient, options: ExecutionOptions) -> Self {
        Self {
            client,
            options,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Starts a new run. Any earlier ticket stops being current.
    pub fn begin(&self) -> RunTicket {
        RunTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no run has started since `ticket` was issued.
    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Executes `code` remotely.
    pub async fn execute(&self, code: &str) -> ExecutionResult {
        let code = if self.options.auto_display {
            auto_display(code)
        } else {
            code.into()
        };

        tracing::info!("Executing {} bytes of code", code.len());
        let request = ExecuteRequest { code: &*code };
        match self
            .client
            .post_json::<_, ExecuteResponse>(&self.options.execute_path, &request)
            .await
        {
            Ok(response) => map_response(response),
            Err(err) => {
                tracing::warn!("Execution request failed: {}", err);
                map_error(err)
            }
        }
    }

    /// Takes a ticket and executes; the caller checks [`Self::is_current`]
    /// before showing the result.
    pub async fn run(&self, code: String) -> (RunTicket, ExecutionResult) {
        let ticket = self.begin();
        let result = self.execute(&code).await;
        (ticket, result)
    }
}

fn map_response(response: ExecuteResponse) -> ExecutionResult {
    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        return ExecutionResult::Failure(error);
    }

    let mut output = response.output.unwrap_or_default();
    if response.status.as_deref() == Some("error") {
        if output.is_empty() {
            output = "Execution failed".to_string();
        }
        return ExecutionResult::Failure(output);
    }

    if response.jupyter_display {
        if let (Some(expression), Some(value)) = (response.expression, response.expression_value) {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            if !output.trim().is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&format!("{expression} = {value}"));
        }
    }

    if output.is_empty() {
        ExecutionResult::Success(NO_OUTPUT.to_string())
    } else {
        ExecutionResult::Success(output)
    }
}

fn map_error(err: ClientError) -> ExecutionResult {
    match err {
        ClientError::Status { status, body } if body.trim().is_empty() => {
            ExecutionResult::Failure(format!("Server returned status {status}"))
        }
        ClientError::Status { body, .. } => ExecutionResult::Failure(body),
        other => ExecutionResult::Failure(other.to_string()),
    }
}
