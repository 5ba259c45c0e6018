//! HTTP client for the external knowledge-graph service.

use crate::error::KgError;
use serde_json::{json, Value};

/// Client for the knowledge-graph service API.
#[derive(Clone)]
pub struct KgClient {
    http: reqwest::Client,
    base_url: String,
}

impl KgClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Compute the subgraph relevant to a question's canonical (nodes, edges)
    /// structure. The relevance computation itself is the service's concern.
    pub async fn relevant_subgraph(&self, nodes: Value, edges: Value) -> Result<Value, KgError> {
        let response = self
            .http
            .post(self.endpoint("subgraph"))
            .json(&json!({ "nodes": nodes, "edges": edges }))
            .send()
            .await?;
        Self::into_json(response).await
    }

    /// Execute the answering computation for a question.
    pub async fn answer(&self, question_id: &str) -> Result<(), KgError> {
        let response = self
            .http
            .post(self.endpoint(&format!("answer/{}", question_id)))
            .send()
            .await?;
        Self::check(response).await
    }

    /// Refresh cached knowledge-graph data for a question.
    pub async fn update(&self, question_id: &str) -> Result<(), KgError> {
        let response = self
            .http
            .post(self.endpoint(&format!("update/{}", question_id)))
            .send()
            .await?;
        Self::check(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value, KgError> {
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: reqwest::Response) -> Result<(), KgError> {
        Self::error_for_status(response).await?;
        Ok(())
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, KgError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "knowledge graph service error");
        Err(KgError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
