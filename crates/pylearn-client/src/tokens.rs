//! AI token usage, for display.

use crate::{ApiClient, ClientResult};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TokenUsageSummary {
    pub total_tokens: u64,
    pub model_breakdown: BTreeMap<String, u64>,
    pub estimated_cost_usd: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenUsageEntry {
    pub id: Option<i64>,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub model: String,
    pub endpoint: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenUsageHistory {
    pub total_tokens: u64,
    pub usage_history: Vec<TokenUsageEntry>,
}

#[derive(Debug, Clone)]
pub struct TokenClient {
    client: ApiClient,
}

impl TokenClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> ClientResult<TokenUsageSummary> {
        self.client.get_json("/token_usage/summary").await
    }

    pub async fn history(&self) -> ClientResult<TokenUsageHistory> {
        self.client.get_json("/token_usage").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn test_summary_and_history() {
        let router = Router::new()
            .route(
                "/api/token_usage/summary",
                get(|| async {
                    Json(json!({
                        "total_tokens": 1500,
                        "model_breakdown": { "gpt-4o-mini": 1500 },
                        "estimated_cost_usd": 0.0225
                    }))
                }),
            )
            .route(
                "/api/token_usage",
                get(|| async {
                    Json(json!({
                        "total_tokens": 1500,
                        "usage_history": [{
                            "id": 1,
                            "prompt_tokens": 1000,
                            "completion_tokens": 500,
                            "total_tokens": 1500,
                            "model": "gpt-4o-mini",
                            "endpoint": "mark_exercise",
                            "timestamp": "2024-01-01 10:00:00"
                        }]
                    }))
                }),
            );
        let base = testing::serve(router).await;
        let client = TokenClient::new(ApiClient::new(base));

        let summary = client.summary().await.unwrap();
        assert_eq!(summary.total_tokens, 1500);
        assert_eq!(summary.model_breakdown["gpt-4o-mini"], 1500);

        let history = client.history().await.unwrap();
        assert_eq!(history.usage_history.len(), 1);
        assert_eq!(history.usage_history[0].endpoint, "mark_exercise");
    }

    #[tokio::test]
    async fn test_counter_only_payload() {
        let router = Router::new().route(
            "/api/token_usage",
            get(|| async {
                Json(json!({
                    "prompt_tokens": 0,
                    "completion_tokens": 0,
                    "total_tokens": 0,
                    "requests": 0
                }))
            }),
        );
        let base = testing::serve(router).await;
        let client = TokenClient::new(ApiClient::new(base));

        let history = client.history().await.unwrap();
        assert_eq!(history, TokenUsageHistory::default());
    }
}
