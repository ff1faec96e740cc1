//! Pure REST API client for the Medipost content-production backend.
//!
//! A clean, minimal client with no workflow logic. It exposes one async
//! method per backend operation, maps transport and API failures into
//! [`MedipostError`], and leaves all state handling to callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use medipost_client::MedipostClient;
//!
//! let client = MedipostClient::from_env()?;
//!
//! let view = client.fetch_workflow_view("post-123").await?;
//! println!("status = {}", view.status);
//! ```

pub mod error;
pub mod types;

pub use error::{MedipostError, Result};
pub use types::*;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Pure Medipost API client.
#[derive(Clone)]
pub struct MedipostClient {
    http_client: Client,
    base_url: String,
    token: String,
}

impl MedipostClient {
    /// Create a new client with the given API token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: "https://api.medipost.io/v1".to_string(),
            token: token.into(),
        }
    }

    /// Create from environment variables `MEDIPOST_API_TOKEN` and
    /// (optionally) `MEDIPOST_API_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("MEDIPOST_API_TOKEN")
            .map_err(|_| MedipostError::Config("MEDIPOST_API_TOKEN not set".into()))?;
        let mut client = Self::new(token);
        if let Ok(url) = std::env::var("MEDIPOST_API_BASE_URL") {
            client = client.with_base_url(url);
        }
        Ok(client)
    }

    /// Set a custom base URL (for staging, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch the consolidated workflow view for a post.
    ///
    /// Idempotent. Callers replace their previous snapshot wholesale.
    pub async fn fetch_workflow_view(&self, post_id: &str) -> Result<WorkflowView> {
        self.get(&format!("posts/{post_id}/workflow")).await
    }

    /// Fetch guide-input data: persona options, emoji-level options, and the
    /// currently saved keyword/guide values. Idempotent.
    pub async fn fetch_guide_input(&self, post_id: &str) -> Result<GuideInput> {
        self.get(&format!("posts/{post_id}/guide-input")).await
    }

    /// Fetch the AI pipeline queue status. Idempotent; intended for polling.
    pub async fn fetch_queue_status(&self) -> Result<QueueStatus> {
        self.get("pipeline/queue-status").await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Update the persona selection. Idempotent (last-write-wins).
    pub async fn update_persona(&self, post_id: &str, update: &PersonaUpdate) -> Result<()> {
        self.put(&format!("posts/{post_id}/guide/persona"), update)
            .await
    }

    /// Update the keyword guide: six sets, writing guide, completion flag.
    /// Idempotent (last-write-wins).
    pub async fn update_keyword_guide(
        &self,
        post_id: &str,
        update: &KeywordGuideUpdate,
    ) -> Result<()> {
        self.put(&format!("posts/{post_id}/guide/keywords"), update)
            .await
    }

    /// Update the emoji-intensity level. Idempotent (last-write-wins).
    pub async fn update_emoji_level(
        &self,
        post_id: &str,
        update: &EmojiLevelUpdate,
    ) -> Result<()> {
        self.put(&format!("posts/{post_id}/guide/emoji-level"), update)
            .await
    }

    /// Transition the post's status with an optional reviewer note.
    ///
    /// NOT idempotent: invoke once per logical transition. The server decides
    /// whether the transition is valid; client-side gating is advisory.
    pub async fn update_post_status(&self, post_id: &str, update: &StatusUpdate) -> Result<()> {
        self.post(&format!("posts/{post_id}/status"), update).await
    }

    /// Trigger AI generation (or regeneration) for the post.
    ///
    /// NOT idempotent. Fire-and-forget: the result is observed through
    /// subsequent workflow fetches and queue polls.
    pub async fn trigger_generation(&self, post_id: &str) -> Result<()> {
        self.post(&format!("posts/{post_id}/generation"), &serde_json::json!({}))
            .await
    }

    /// Manually edit the generated content. Idempotent (last-write-wins).
    pub async fn update_post_content(&self, post_id: &str, update: &ContentUpdate) -> Result<()> {
        self.put(&format!("posts/{post_id}/content"), update).await
    }

    /// Schedule the post for publishing. Idempotent.
    pub async fn schedule_publish(&self, post_id: &str, req: &PublishSchedule) -> Result<()> {
        self.put(&format!("posts/{post_id}/schedule"), req).await
    }

    // =========================================================================
    // Transport helpers
    // =========================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Medipost GET");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "Medipost request failed");
                MedipostError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Medipost API error");
            return Err(MedipostError::Api(format!(
                "Medipost API error ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MedipostError::Parse(e.to_string()))
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(reqwest::Method::PUT, path, body).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(reqwest::Method::POST, path, body).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(method = %method, url = %url, "Medipost request");

        let response = self
            .http_client
            .request(method, &url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "Medipost request failed");
                MedipostError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Medipost API error");
            return Err(MedipostError::Api(format!(
                "Medipost API error ({status}): {error_text}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = MedipostClient::new("mp-test").with_base_url("https://staging.medipost.io/v1");

        assert_eq!(client.token, "mp-test");
        assert_eq!(client.base_url(), "https://staging.medipost.io/v1");
    }
}
