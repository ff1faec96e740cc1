//! Workflow orchestrator: one post selection, driven against the remote
//! system of record.
//!
//! The orchestrator owns the per-selection state (workflow view, guide
//! draft, canonical stage) and enforces the rules around it:
//!
//! - actions are gated locally against the stage gate before any network
//!   call is made;
//! - every successful mutation is followed by a full refetch: the backend
//!   may advance fields a local patch would miss, so nothing is patched
//!   optimistically;
//! - selections race by epoch: each `select_post` bumps a counter, and a
//!   response is applied only if its epoch is still current. Stale responses
//!   are discarded silently, never surfaced as errors;
//! - remote failures are caught here and converted to display-ready values,
//!   with the previous `Ready` data left intact.
//!
//! The handle is cheaply cloneable; state lives behind a mutex that is never
//! held across an await.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use medipost_client::{
    ContentUpdate, EmojiLevelUpdate, KeywordGuideUpdate, MedipostError, PersonaUpdate,
    PublishSchedule, StatusUpdate, WorkflowView,
};

use crate::backend::WorkflowBackend;
use crate::draft::{FieldGroup, GuideDraft};
use crate::error::{Result, WorkflowError};
use crate::stage::{permits, permitted_stages, UiStage};
use crate::status::CanonicalStage;

/// Lifecycle phase of the orchestrator.
///
/// "Ready with error" is `Ready` plus a populated `last_error`; the data of
/// the last known-good snapshot stays available either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No post selected.
    Idle,
    /// A selection fetch is in flight.
    Loading,
    /// View and draft are hydrated; stages are selectable.
    Ready,
    /// An approve/reject/regenerate/schedule call is in flight.
    Mutating,
}

/// A user-triggered workflow action. Each targets exactly one UI stage, and
/// is rejected locally when that stage is not yet permitted.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    ApproveMaterial,
    RejectMaterial { reason: String },
    /// Only offered once the guide draft is complete.
    CompleteGuide,
    TriggerGeneration,
    Regenerate,
    ApproveResult,
    RejectResult { reason: String },
    UpdateContent { title: Option<String>, content: String },
    ClientApprove,
    ClientReject { reason: String },
    SchedulePublish { date: NaiveDate, time: NaiveTime },
}

impl WorkflowAction {
    /// The UI stage this action belongs to, for gating.
    pub fn target_stage(&self) -> UiStage {
        match self {
            WorkflowAction::ApproveMaterial | WorkflowAction::RejectMaterial { .. } => {
                UiStage::MaterialReview
            }
            WorkflowAction::CompleteGuide => UiStage::GuideProvision,
            WorkflowAction::TriggerGeneration | WorkflowAction::Regenerate => {
                UiStage::AiGeneration
            }
            WorkflowAction::ApproveResult
            | WorkflowAction::RejectResult { .. }
            | WorkflowAction::UpdateContent { .. } => UiStage::ResultReview,
            WorkflowAction::ClientApprove | WorkflowAction::ClientReject { .. } => {
                UiStage::ClientReview
            }
            WorkflowAction::SchedulePublish { .. } => UiStage::PublishReadiness,
        }
    }
}

/// Read-only snapshot of the orchestrator for rendering.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub post_id: Option<String>,
    pub stage: Option<CanonicalStage>,
    pub permitted: HashSet<UiStage>,
    pub view: Option<WorkflowView>,
    pub last_error: Option<String>,
}

struct Inner {
    phase: Phase,
    /// Selection epoch; bumped by every `select_post`. Responses stamped
    /// with an older epoch are discarded.
    epoch: u64,
    post_id: Option<String>,
    view: Option<WorkflowView>,
    stage: Option<CanonicalStage>,
    draft: GuideDraft,
    /// Field groups with a commit in flight. A second commit for the same
    /// group is rejected as busy, not queued.
    committing: HashSet<FieldGroup>,
    last_error: Option<String>,
}

impl Inner {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            epoch: 0,
            post_id: None,
            view: None,
            stage: None,
            draft: GuideDraft::default(),
            committing: HashSet::new(),
            last_error: None,
        }
    }
}

/// Orchestrates the workflow of a single selected post.
pub struct WorkflowOrchestrator<B> {
    backend: Arc<B>,
    inner: Arc<Mutex<Inner>>,
}

impl<B> Clone for WorkflowOrchestrator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: WorkflowBackend> WorkflowOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            inner: Arc::new(Mutex::new(Inner::new())),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("orchestrator state poisoned")
    }

    /// Read-only snapshot for rendering.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            phase: inner.phase,
            post_id: inner.post_id.clone(),
            stage: inner.stage,
            permitted: inner.stage.map(permitted_stages).unwrap_or_default(),
            view: inner.view.clone(),
            last_error: inner.last_error.clone(),
        }
    }

    /// Run a closure against the current post's guide draft.
    ///
    /// Requires a hydrated selection; draft edits during `Loading` would be
    /// wiped by the hydration about to land.
    pub fn with_draft<R>(&self, f: impl FnOnce(&mut GuideDraft) -> R) -> Result<R> {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Idle => Err(WorkflowError::NoSelection),
            Phase::Loading => Err(WorkflowError::Busy),
            Phase::Ready | Phase::Mutating => Ok(f(&mut inner.draft)),
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a post: fetch its workflow view and guide input, hydrate the
    /// draft, and derive the canonical stage.
    ///
    /// Last selection wins. Any unsaved draft for the previous post is
    /// discarded, and a late-arriving response for it is dropped.
    pub async fn select_post(&self, post_id: &str) -> Result<()> {
        let epoch = {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.phase = Phase::Loading;
            inner.post_id = Some(post_id.to_string());
            inner.view = None;
            inner.stage = None;
            inner.draft = GuideDraft::default();
            inner.committing.clear();
            inner.last_error = None;
            inner.epoch
        };

        let view = match self.backend.fetch_workflow_view(post_id).await {
            Ok(view) => view,
            Err(e) => return self.fail_load(epoch, e),
        };
        let guide = match self.backend.fetch_guide_input(post_id).await {
            Ok(guide) => guide,
            Err(e) => return self.fail_load(epoch, e),
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!(post_id, "discarding stale workflow fetch");
            return Ok(());
        }
        inner.stage = Some(CanonicalStage::from_raw(&view.status));
        inner.view = Some(view);
        inner.draft.hydrate(guide);
        inner.phase = Phase::Ready;
        Ok(())
    }

    /// Full refresh of the current selection.
    pub async fn refresh(&self) -> Result<()> {
        let post_id = self
            .lock()
            .post_id
            .clone()
            .ok_or(WorkflowError::NoSelection)?;
        self.select_post(&post_id).await
    }

    fn fail_load(&self, epoch: u64, err: MedipostError) -> Result<()> {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            // A stale failure is as discardable as a stale success.
            return Ok(());
        }
        inner.phase = Phase::Idle;
        inner.last_error = Some(err.to_string());
        Err(WorkflowError::Backend(err))
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Dispatch a user-triggered action for the selected post.
    ///
    /// Rejected locally, with zero network calls, when the action's target
    /// stage is not permitted by the current canonical stage. On remote
    /// success the whole selection is refetched; on failure the previous
    /// data stays intact and the error is surfaced.
    pub async fn perform_action(&self, action: WorkflowAction) -> Result<()> {
        let (epoch, post_id) = {
            let mut inner = self.lock();
            match inner.phase {
                Phase::Idle => return Err(WorkflowError::NoSelection),
                Phase::Loading | Phase::Mutating => return Err(WorkflowError::Busy),
                Phase::Ready => {}
            }
            let post_id = match inner.post_id.clone() {
                Some(id) => id,
                None => return Err(WorkflowError::NoSelection),
            };
            let stage = inner.stage.unwrap_or(CanonicalStage::Unknown);
            let target = action.target_stage();
            if !permits(stage, target) {
                return Err(WorkflowError::NotPermitted(target));
            }
            if matches!(action, WorkflowAction::CompleteGuide) && !inner.draft.is_complete() {
                return Err(WorkflowError::GuideIncomplete);
            }
            inner.phase = Phase::Mutating;
            (inner.epoch, post_id)
        };

        let result = self.dispatch(&post_id, &action).await;

        {
            let mut inner = self.lock();
            if inner.epoch != epoch {
                // Selection moved on while the call was in flight.
                debug!(post_id, "discarding stale action outcome");
                return Ok(());
            }
            inner.phase = Phase::Ready;
            match &result {
                Ok(()) => inner.last_error = None,
                Err(e) => inner.last_error = Some(e.to_string()),
            }
        }
        result?;

        // The backend may have advanced other fields as a side effect, so a
        // local patch is never enough.
        self.select_post(&post_id).await
    }

    async fn dispatch(
        &self,
        post_id: &str,
        action: &WorkflowAction,
    ) -> std::result::Result<(), MedipostError> {
        match action {
            WorkflowAction::ApproveMaterial => {
                self.transition(post_id, "material_review_completed", None).await
            }
            WorkflowAction::RejectMaterial { reason } => {
                self.transition(post_id, "material_rejected", Some(reason.clone()))
                    .await
            }
            WorkflowAction::CompleteGuide => {
                self.transition(post_id, "guide_completed", None).await
            }
            WorkflowAction::TriggerGeneration | WorkflowAction::Regenerate => {
                // Fire-and-forget; progress shows up through later fetches.
                self.backend.trigger_generation(post_id).await
            }
            WorkflowAction::ApproveResult => {
                self.transition(post_id, "admin_review_completed", None).await
            }
            WorkflowAction::RejectResult { reason } => {
                self.transition(post_id, "result_rejected", Some(reason.clone()))
                    .await
            }
            WorkflowAction::UpdateContent { title, content } => {
                let update = ContentUpdate {
                    title: title.clone(),
                    content: content.clone(),
                };
                self.backend.update_post_content(post_id, &update).await
            }
            WorkflowAction::ClientApprove => {
                self.transition(post_id, "client_approved", None).await
            }
            WorkflowAction::ClientReject { reason } => {
                self.transition(post_id, "client_rejected", Some(reason.clone()))
                    .await
            }
            WorkflowAction::SchedulePublish { date, time } => {
                let req = PublishSchedule {
                    date: *date,
                    time: *time,
                    status: "publish_scheduled".to_string(),
                };
                self.backend.schedule_publish(post_id, &req).await
            }
        }
    }

    async fn transition(
        &self,
        post_id: &str,
        status: &str,
        note: Option<String>,
    ) -> std::result::Result<(), MedipostError> {
        let update = StatusUpdate {
            status: status.to_string(),
            note,
        };
        self.backend.update_post_status(post_id, &update).await
    }

    // =========================================================================
    // Draft commits
    // =========================================================================

    /// Commit one field group of the guide draft.
    ///
    /// On success the draft is re-hydrated from the server's authoritative
    /// echo. On failure edit mode stays open and the draft keeps the user's
    /// unsaved values, so the same commit can be retried as-is. A second
    /// concurrent commit for the same group is rejected as busy.
    pub async fn commit(&self, group: FieldGroup) -> Result<()> {
        enum Payload {
            Persona(PersonaUpdate),
            Keywords(KeywordGuideUpdate),
            Emoji(EmojiLevelUpdate),
        }

        let (epoch, post_id, payload) = {
            let mut inner = self.lock();
            match inner.phase {
                Phase::Idle => return Err(WorkflowError::NoSelection),
                Phase::Loading | Phase::Mutating => return Err(WorkflowError::Busy),
                Phase::Ready => {}
            }
            let post_id = match inner.post_id.clone() {
                Some(id) => id,
                None => return Err(WorkflowError::NoSelection),
            };
            let payload = match group {
                FieldGroup::Persona => match inner.draft.persona_payload() {
                    Some(p) => Payload::Persona(p),
                    // Nothing selected yet; nothing to send.
                    None => return Ok(()),
                },
                FieldGroup::Keywords => Payload::Keywords(inner.draft.keyword_payload()),
                FieldGroup::Emoji => match inner.draft.emoji_payload() {
                    Some(e) => Payload::Emoji(e),
                    None => return Ok(()),
                },
            };
            if !inner.committing.insert(group) {
                return Err(WorkflowError::Busy);
            }
            (inner.epoch, post_id, payload)
        };

        let result = match &payload {
            Payload::Persona(update) => self.backend.update_persona(&post_id, update).await,
            Payload::Keywords(update) => {
                self.backend.update_keyword_guide(&post_id, update).await
            }
            Payload::Emoji(update) => self.backend.update_emoji_level(&post_id, update).await,
        };

        if let Err(err) = result {
            let mut inner = self.lock();
            inner.committing.remove(&group);
            if inner.epoch != epoch {
                return Ok(());
            }
            // Draft and edit mode untouched: the user's input survives for a
            // retry.
            inner.last_error = Some(err.to_string());
            return Err(WorkflowError::Backend(err));
        }

        // The backend may normalize or reject values, so local state is not
        // trusted post-commit; re-hydrate from its echo.
        let echo = self.backend.fetch_guide_input(&post_id).await;

        let mut inner = self.lock();
        inner.committing.remove(&group);
        if inner.epoch != epoch {
            debug!(post_id, "discarding stale commit echo");
            return Ok(());
        }
        match echo {
            Ok(guide) => {
                inner.draft.hydrate(guide);
                inner.last_error = None;
                Ok(())
            }
            Err(err) => {
                // The write landed but the echo didn't; keep the draft so the
                // user can refresh or retry explicitly.
                inner.last_error = Some(err.to_string());
                Err(WorkflowError::Backend(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use medipost_client::{GuideInput, QueueStatus};

    use crate::draft::KeywordSetKind;

    /// Programmable mock backend with call counters.
    #[derive(Default)]
    struct MockBackend {
        statuses: Mutex<HashMap<String, String>>,
        fetch_delays: Mutex<HashMap<String, Duration>>,
        status_calls: AtomicU32,
        keyword_calls: AtomicU32,
        generation_calls: AtomicU32,
        queue_calls: AtomicU32,
        fail_next_keyword_commit: AtomicBool,
        fail_next_status_update: AtomicBool,
        slow_keyword_commit: AtomicBool,
    }

    impl MockBackend {
        fn with_post(self, post_id: &str, status: &str) -> Self {
            self.statuses
                .lock()
                .unwrap()
                .insert(post_id.to_string(), status.to_string());
            self
        }

        fn with_fetch_delay(self, post_id: &str, delay: Duration) -> Self {
            self.fetch_delays
                .lock()
                .unwrap()
                .insert(post_id.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl WorkflowBackend for MockBackend {
        async fn fetch_workflow_view(
            &self,
            post_id: &str,
        ) -> std::result::Result<WorkflowView, MedipostError> {
            let delay = self.fetch_delays.lock().unwrap().get(post_id).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let status = self
                .statuses
                .lock()
                .unwrap()
                .get(post_id)
                .cloned()
                .ok_or_else(|| MedipostError::Api(format!("no such post: {post_id}")))?;
            Ok(WorkflowView {
                post_id: post_id.to_string(),
                status,
                title: None,
                publish_date: None,
                hospital: None,
                campaign: None,
                material: None,
                clinical_context: None,
                publish_schedule: Vec::new(),
            })
        }

        async fn fetch_guide_input(
            &self,
            _post_id: &str,
        ) -> std::result::Result<GuideInput, MedipostError> {
            Ok(GuideInput::default())
        }

        async fn update_persona(
            &self,
            _post_id: &str,
            _update: &PersonaUpdate,
        ) -> std::result::Result<(), MedipostError> {
            Ok(())
        }

        async fn update_keyword_guide(
            &self,
            _post_id: &str,
            _update: &KeywordGuideUpdate,
        ) -> std::result::Result<(), MedipostError> {
            if self.slow_keyword_commit.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            self.keyword_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_next_keyword_commit.swap(false, Ordering::SeqCst) {
                return Err(MedipostError::Network("connection reset".into()));
            }
            Ok(())
        }

        async fn update_emoji_level(
            &self,
            _post_id: &str,
            _update: &EmojiLevelUpdate,
        ) -> std::result::Result<(), MedipostError> {
            Ok(())
        }

        async fn update_post_status(
            &self,
            post_id: &str,
            update: &StatusUpdate,
        ) -> std::result::Result<(), MedipostError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_next_status_update.swap(false, Ordering::SeqCst) {
                return Err(MedipostError::Api("transition rejected".into()));
            }
            self.statuses
                .lock()
                .unwrap()
                .insert(post_id.to_string(), update.status.clone());
            Ok(())
        }

        async fn trigger_generation(
            &self,
            _post_id: &str,
        ) -> std::result::Result<(), MedipostError> {
            self.generation_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn update_post_content(
            &self,
            _post_id: &str,
            _update: &ContentUpdate,
        ) -> std::result::Result<(), MedipostError> {
            Ok(())
        }

        async fn schedule_publish(
            &self,
            _post_id: &str,
            _req: &PublishSchedule,
        ) -> std::result::Result<(), MedipostError> {
            Ok(())
        }

        async fn fetch_queue_status(&self) -> std::result::Result<QueueStatus, MedipostError> {
            self.queue_calls.fetch_add(1, Ordering::SeqCst);
            Ok(QueueStatus::default())
        }
    }

    #[tokio::test]
    async fn test_select_post_hydrates_and_derives_stage() {
        let orch = WorkflowOrchestrator::new(
            MockBackend::default().with_post("p-1", "material_review_completed"),
        );

        orch.select_post("p-1").await.unwrap();

        let snap = orch.snapshot();
        assert_eq!(snap.phase, Phase::Ready);
        assert_eq!(snap.post_id.as_deref(), Some("p-1"));
        assert_eq!(snap.stage, Some(CanonicalStage::GuideProvision));
        assert_eq!(
            snap.permitted,
            HashSet::from([UiStage::MaterialReview, UiStage::GuideProvision])
        );
        assert!(snap.last_error.is_none());
    }

    #[tokio::test]
    async fn test_last_selection_wins() {
        let backend = MockBackend::default()
            .with_post("a", "material_review")
            .with_post("b", "client_review")
            .with_fetch_delay("a", Duration::from_millis(50))
            .with_fetch_delay("b", Duration::from_millis(5));
        let orch = WorkflowOrchestrator::new(backend);
        let orch_b = orch.clone();

        // A is selected first but resolves last; its response must be
        // discarded, not applied.
        let (res_a, res_b) =
            tokio::join!(orch.select_post("a"), orch_b.select_post("b"));
        res_a.unwrap();
        res_b.unwrap();

        let snap = orch.snapshot();
        assert_eq!(snap.post_id.as_deref(), Some("b"));
        assert_eq!(snap.stage, Some(CanonicalStage::ClientReview));
        assert_eq!(snap.phase, Phase::Ready);
    }

    #[tokio::test]
    async fn test_not_permitted_action_makes_no_network_call() {
        let orch =
            WorkflowOrchestrator::new(MockBackend::default().with_post("p-1", "initial"));
        orch.select_post("p-1").await.unwrap();

        let err = orch
            .perform_action(WorkflowAction::ApproveResult)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::NotPermitted(UiStage::ResultReview)
        ));
        assert_eq!(orch.backend().status_calls.load(Ordering::SeqCst), 0);
        assert_eq!(orch.backend().generation_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_approve_material_refetches_and_advances() {
        let orch = WorkflowOrchestrator::new(
            MockBackend::default().with_post("p-1", "material_review"),
        );
        orch.select_post("p-1").await.unwrap();

        orch.perform_action(WorkflowAction::ApproveMaterial)
            .await
            .unwrap();

        let snap = orch.snapshot();
        // The stage reflects the server-confirmed status, not a local patch.
        assert_eq!(snap.stage, Some(CanonicalStage::GuideProvision));
        assert_eq!(orch.backend().status_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutation_failure_keeps_ready_with_data() {
        let backend = MockBackend::default().with_post("p-1", "material_review");
        backend.fail_next_status_update.store(true, Ordering::SeqCst);
        let orch = WorkflowOrchestrator::new(backend);
        orch.select_post("p-1").await.unwrap();

        let err = orch
            .perform_action(WorkflowAction::ApproveMaterial)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Backend(_)));

        let snap = orch.snapshot();
        assert_eq!(snap.phase, Phase::Ready);
        assert!(snap.view.is_some(), "previous data must stay intact");
        assert_eq!(snap.stage, Some(CanonicalStage::MaterialReview));
        assert!(snap.last_error.is_some());
    }

    #[tokio::test]
    async fn test_complete_guide_gated_on_draft_completion() {
        let orch = WorkflowOrchestrator::new(
            MockBackend::default().with_post("p-1", "guide_provision"),
        );
        orch.select_post("p-1").await.unwrap();

        let err = orch
            .perform_action(WorkflowAction::CompleteGuide)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::GuideIncomplete));
        assert_eq!(orch.backend().status_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_commit_preserves_draft_and_allows_retry() {
        let backend = MockBackend::default().with_post("p-1", "guide_provision");
        backend
            .fail_next_keyword_commit
            .store(true, Ordering::SeqCst);
        let orch = WorkflowOrchestrator::new(backend);
        orch.select_post("p-1").await.unwrap();

        orch.with_draft(|draft| {
            draft.enter_edit(FieldGroup::Keywords);
            draft.add_keyword(KeywordSetKind::Symptom, "치아 통증");
        })
        .unwrap();

        let err = orch.commit(FieldGroup::Keywords).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Backend(_)));

        // Unsaved input survives and edit mode stays open.
        orch.with_draft(|draft| {
            assert!(draft.is_editing(FieldGroup::Keywords));
            assert!(draft.keywords(KeywordSetKind::Symptom).contains("치아 통증"));
        })
        .unwrap();
        assert!(orch.snapshot().last_error.is_some());

        // Retry with the same data, without re-entering edit mode.
        orch.commit(FieldGroup::Keywords).await.unwrap();
        assert_eq!(orch.backend().keyword_calls.load(Ordering::SeqCst), 2);

        // Success re-hydrates from the server echo, closing edit mode.
        orch.with_draft(|draft| {
            assert!(!draft.is_editing(FieldGroup::Keywords));
        })
        .unwrap();
        assert!(orch.snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_same_group_commit_is_busy() {
        let backend = MockBackend::default().with_post("p-1", "guide_provision");
        backend.slow_keyword_commit.store(true, Ordering::SeqCst);
        let orch = WorkflowOrchestrator::new(backend);
        orch.select_post("p-1").await.unwrap();

        orch.with_draft(|draft| draft.add_keyword(KeywordSetKind::Region, "강남"))
            .unwrap();

        let second = orch.clone();
        let (first_res, second_res) = tokio::join!(
            orch.commit(FieldGroup::Keywords),
            second.commit(FieldGroup::Keywords)
        );

        first_res.unwrap();
        assert!(matches!(second_res.unwrap_err(), WorkflowError::Busy));
        // The rejected commit never reached the backend.
        assert_eq!(orch.backend().keyword_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_of_unset_persona_is_noop() {
        let orch = WorkflowOrchestrator::new(
            MockBackend::default().with_post("p-1", "guide_provision"),
        );
        orch.select_post("p-1").await.unwrap();

        orch.commit(FieldGroup::Persona).await.unwrap();
    }

    #[tokio::test]
    async fn test_action_without_selection_is_rejected() {
        let orch = WorkflowOrchestrator::new(MockBackend::default());

        let err = orch
            .perform_action(WorkflowAction::ApproveMaterial)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NoSelection));
    }

    #[tokio::test]
    async fn test_failed_load_surfaces_error_and_goes_idle() {
        let orch = WorkflowOrchestrator::new(MockBackend::default());

        let err = orch.select_post("missing").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Backend(_)));

        let snap = orch.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.last_error.is_some());
    }

    #[tokio::test]
    async fn test_switching_posts_discards_draft() {
        let orch = WorkflowOrchestrator::new(
            MockBackend::default()
                .with_post("a", "guide_provision")
                .with_post("b", "guide_provision"),
        );
        orch.select_post("a").await.unwrap();
        orch.with_draft(|draft| draft.add_keyword(KeywordSetKind::Region, "강남"))
            .unwrap();

        orch.select_post("b").await.unwrap();

        orch.with_draft(|draft| {
            assert!(draft.keywords(KeywordSetKind::Region).is_empty());
        })
        .unwrap();
    }
}
