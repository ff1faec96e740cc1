//! Error types for the workflow layer.
//!
//! Everything a remote call can throw is caught at the orchestrator boundary
//! and carried as one of these display-ready values; nothing propagates as a
//! panic. Retries are manual; the caller re-triggers the action.

use thiserror::Error;

use medipost_client::MedipostError;

use crate::stage::UiStage;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Workflow layer errors.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No post is selected; the operation needs one.
    #[error("no post selected")]
    NoSelection,

    /// A fetch or mutation is already in flight; the caller must wait, not
    /// queue.
    #[error("a conflicting request is already in flight")]
    Busy,

    /// The action targets a stage the current status has not unlocked.
    /// Rejected locally; no remote call was made.
    #[error("stage not permitted yet: {}", .0.label())]
    NotPermitted(UiStage),

    /// Guide provision cannot complete while keyword sets or the writing
    /// guide are empty.
    #[error("writing guide is incomplete")]
    GuideIncomplete,

    /// The remote call failed; previous state is intact.
    #[error(transparent)]
    Backend(#[from] MedipostError),
}
