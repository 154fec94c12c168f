//! Backend liveness probe.

use crate::{ApiClient, ClientResult};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ApiClient {
    pub async fn health(&self) -> ClientResult<Health> {
        self.get_json("/health").await
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
    async fn test_health() {
        let router = Router::new().route(
            "/api/health",
            get(|| async { Json(json!({ "status": "healthy", "service": "python-learning" })) }),
        );
        let client = ApiClient::new(testing::serve(router).await);

        let health = client.health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.service, "python-learning");
    }

    #[tokio::test]
    async fn test_health_unreachable() {
        let client = ApiClient::new(testing::unreachable());
        let err = client.health().await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to connect to the server"));
    }
}
