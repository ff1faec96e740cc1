//! # Postflow
//!
//! A client-side workflow state layer for the Medipost content-production
//! backend: the catalog normalizes, the gate permits, and the server stays
//! authoritative.
//!
//! ## Core concepts
//!
//! Postflow separates **derived state** from **owned state**:
//! - The canonical stage of a post is always a function of the
//!   server-confirmed raw status ([`CanonicalStage::from_raw`]). It is never
//!   stored and never patched optimistically.
//! - The guide draft ([`GuideDraft`]) is the one piece of state the client
//!   session owns, and only until it is committed and re-hydrated from the
//!   server's echo.
//!
//! ## Architecture
//!
//! ```text
//! UI event
//!     │
//!     ▼
//! WorkflowOrchestrator ── permits? ──► StageGate (pure, per render)
//!     │                                    ▲
//!     │ remote call                        │ canonical stage
//!     ▼                                    │
//! WorkflowBackend (HTTP) ──► refetch ──► StatusCatalog
//!     │
//!     └─► GuideDraft.hydrate()   (authoritative echo)
//! ```
//!
//! ## Key invariants
//!
//! 1. **The server is authoritative**: the permitted-stage set changes only
//!    after a server-confirmed status; no optimistic updates.
//! 2. **Progress never revokes**: the stage gate is a monotonic staircase.
//! 3. **Last selection wins**: responses for an abandoned selection are
//!    silently discarded by epoch.
//! 4. **Failed writes lose nothing**: a failed commit keeps the draft and
//!    its edit mode so the user can retry as-is.

mod backend;
mod draft;
mod error;
mod orchestrator;
mod poll;
mod post;
mod stage;
mod status;

// Re-export catalog and gate
pub use stage::{permits, permitted_stages, UiStage, ALL_STAGES};
pub use status::CanonicalStage;

// Re-export post model
pub use post::{sort_by_publish_date, Post};

// Re-export draft types
pub use draft::{FieldGroup, GuideDraft, KeywordSetKind, ALL_KEYWORD_SETS};

// Re-export orchestrator types
pub use orchestrator::{Phase, Snapshot, WorkflowAction, WorkflowOrchestrator};

// Re-export backend seam
pub use backend::WorkflowBackend;

// Re-export queue monitor
pub use poll::{QueueMonitor, DEFAULT_POLL_PERIOD};

// Re-export error types
pub use error::{Result, WorkflowError};

// Re-export commonly used external types
pub use async_trait::async_trait;
