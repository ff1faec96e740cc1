//! Backend seam: the remote operations the workflow layer depends on.
//!
//! Infrastructure trait only, no workflow logic. The orchestrator and the
//! queue monitor are generic over it, which is also how tests inject mocks.

use async_trait::async_trait;

use medipost_client::{
    ContentUpdate, EmojiLevelUpdate, GuideInput, KeywordGuideUpdate, MedipostClient,
    MedipostError, PersonaUpdate, PublishSchedule, QueueStatus, StatusUpdate, WorkflowView,
};

type Result<T> = std::result::Result<T, MedipostError>;

/// Remote system-of-record operations, one per backend endpoint.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    async fn fetch_workflow_view(&self, post_id: &str) -> Result<WorkflowView>;

    async fn fetch_guide_input(&self, post_id: &str) -> Result<GuideInput>;

    async fn update_persona(&self, post_id: &str, update: &PersonaUpdate) -> Result<()>;

    async fn update_keyword_guide(&self, post_id: &str, update: &KeywordGuideUpdate)
        -> Result<()>;

    async fn update_emoji_level(&self, post_id: &str, update: &EmojiLevelUpdate) -> Result<()>;

    async fn update_post_status(&self, post_id: &str, update: &StatusUpdate) -> Result<()>;

    async fn trigger_generation(&self, post_id: &str) -> Result<()>;

    async fn update_post_content(&self, post_id: &str, update: &ContentUpdate) -> Result<()>;

    async fn schedule_publish(&self, post_id: &str, req: &PublishSchedule) -> Result<()>;

    async fn fetch_queue_status(&self) -> Result<QueueStatus>;
}

#[async_trait]
impl WorkflowBackend for MedipostClient {
    async fn fetch_workflow_view(&self, post_id: &str) -> Result<WorkflowView> {
        MedipostClient::fetch_workflow_view(self, post_id).await
    }

    async fn fetch_guide_input(&self, post_id: &str) -> Result<GuideInput> {
        MedipostClient::fetch_guide_input(self, post_id).await
    }

    async fn update_persona(&self, post_id: &str, update: &PersonaUpdate) -> Result<()> {
        MedipostClient::update_persona(self, post_id, update).await
    }

    async fn update_keyword_guide(
        &self,
        post_id: &str,
        update: &KeywordGuideUpdate,
    ) -> Result<()> {
        MedipostClient::update_keyword_guide(self, post_id, update).await
    }

    async fn update_emoji_level(&self, post_id: &str, update: &EmojiLevelUpdate) -> Result<()> {
        MedipostClient::update_emoji_level(self, post_id, update).await
    }

    async fn update_post_status(&self, post_id: &str, update: &StatusUpdate) -> Result<()> {
        MedipostClient::update_post_status(self, post_id, update).await
    }

    async fn trigger_generation(&self, post_id: &str) -> Result<()> {
        MedipostClient::trigger_generation(self, post_id).await
    }

    async fn update_post_content(&self, post_id: &str, update: &ContentUpdate) -> Result<()> {
        MedipostClient::update_post_content(self, post_id, update).await
    }

    async fn schedule_publish(&self, post_id: &str, req: &PublishSchedule) -> Result<()> {
        MedipostClient::schedule_publish(self, post_id, req).await
    }

    async fn fetch_queue_status(&self) -> Result<QueueStatus> {
        MedipostClient::fetch_queue_status(self).await
    }
}
