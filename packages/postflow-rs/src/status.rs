//! Status catalog: normalizes raw backend status codes into canonical stages.
//!
//! The backend's status vocabulary has grown synonyms over time (e.g.
//! `agent_completed` vs `generation_completed`), and new codes keep
//! appearing. Everything funnels through the single table here: adding a
//! backend code is a one-line change, and anything unrecognized collapses to
//! [`CanonicalStage::Unknown`] instead of failing.

use serde::{Deserialize, Serialize};

/// Canonical lifecycle stage of a post.
///
/// Derived from the raw status string, never stored. Many raw codes map to
/// one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStage {
    /// Provisioned, nothing started yet.
    Initial,
    /// Source materials awaiting admin review.
    MaterialReview,
    /// Writing guide (persona, keywords, emoji level) being provided.
    GuideProvision,
    /// AI generation requested, running, or failed-and-retryable.
    Generation,
    /// Generated content awaiting admin review.
    ResultReview,
    /// Content awaiting client (hospital) review.
    ClientReview,
    /// Approved and ready for (or already) scheduled publishing.
    PublishReady,
    /// Published.
    Published,
    /// Unrecognized backend code; nothing is actionable.
    Unknown,
}

/// Raw-code → canonical-stage table. Synonyms collapse here and nowhere else.
///
/// Failure variants (`generation_failed`, `generation_partial`) deliberately
/// stay at the pre-failure stage so retry remains reachable. Rejection codes
/// land back at the stage that has to be redone.
const STATUS_TABLE: &[(&str, CanonicalStage)] = &[
    ("initial", CanonicalStage::Initial),
    // Material review
    ("material_review", CanonicalStage::MaterialReview),
    ("material_review_requested", CanonicalStage::MaterialReview),
    ("material_rejected", CanonicalStage::MaterialReview),
    // Guide provision
    ("material_review_completed", CanonicalStage::GuideProvision),
    ("guide_provision", CanonicalStage::GuideProvision),
    ("guide_requested", CanonicalStage::GuideProvision),
    // Generation
    ("guide_completed", CanonicalStage::Generation),
    ("generation_requested", CanonicalStage::Generation),
    ("generation_processing", CanonicalStage::Generation),
    ("agent_processing", CanonicalStage::Generation),
    ("generation_failed", CanonicalStage::Generation),
    ("generation_partial", CanonicalStage::Generation),
    ("result_rejected", CanonicalStage::Generation),
    // Result review
    ("agent_completed", CanonicalStage::ResultReview),
    ("generation_completed", CanonicalStage::ResultReview),
    ("admin_review", CanonicalStage::ResultReview),
    ("client_rejected", CanonicalStage::ResultReview),
    // Client review
    ("admin_review_completed", CanonicalStage::ClientReview),
    ("client_review", CanonicalStage::ClientReview),
    // Publish readiness
    ("client_approved", CanonicalStage::PublishReady),
    ("publish_scheduled", CanonicalStage::PublishReady),
    // Terminal
    ("published", CanonicalStage::Published),
];

impl CanonicalStage {
    /// Map a raw backend status code to its canonical stage.
    ///
    /// Total: every input maps to exactly one stage, unrecognized codes to
    /// [`CanonicalStage::Unknown`]. Never errors.
    pub fn from_raw(raw: &str) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(code, _)| *code == raw)
            .map(|(_, stage)| *stage)
            .unwrap_or(CanonicalStage::Unknown)
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalStage::Initial => "Not started",
            CanonicalStage::MaterialReview => "Material review",
            CanonicalStage::GuideProvision => "Guide provision",
            CanonicalStage::Generation => "AI generation",
            CanonicalStage::ResultReview => "Result review",
            CanonicalStage::ClientReview => "Client review",
            CanonicalStage::PublishReady => "Ready to publish",
            CanonicalStage::Published => "Published",
            CanonicalStage::Unknown => "Unknown status",
        }
    }

    /// True once the post has reached its terminal stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, CanonicalStage::Published)
    }

    /// All raw codes the catalog currently knows, for diagnostics.
    pub fn known_raw_codes() -> impl Iterator<Item = &'static str> {
        STATUS_TABLE.iter().map(|(code, _)| *code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_deterministically() {
        for code in CanonicalStage::known_raw_codes() {
            let first = CanonicalStage::from_raw(code);
            let second = CanonicalStage::from_raw(code);
            assert_eq!(first, second, "mapping for {code} must be stable");
            assert_ne!(
                first,
                CanonicalStage::Unknown,
                "known code {code} must not fall through to Unknown"
            );
        }
    }

    #[test]
    fn test_synonyms_collapse() {
        assert_eq!(
            CanonicalStage::from_raw("agent_completed"),
            CanonicalStage::from_raw("generation_completed"),
        );
        assert_eq!(
            CanonicalStage::from_raw("material_review"),
            CanonicalStage::from_raw("material_review_requested"),
        );
    }

    #[test]
    fn test_unrecognized_falls_back_to_unknown() {
        assert_eq!(
            CanonicalStage::from_raw("some_future_status"),
            CanonicalStage::Unknown
        );
        assert_eq!(CanonicalStage::from_raw(""), CanonicalStage::Unknown);
    }

    #[test]
    fn test_failure_variants_stay_pre_failure() {
        assert_eq!(
            CanonicalStage::from_raw("generation_failed"),
            CanonicalStage::Generation
        );
        assert_eq!(
            CanonicalStage::from_raw("generation_partial"),
            CanonicalStage::Generation
        );
    }

    #[test]
    fn test_rejections_return_to_redo_stage() {
        assert_eq!(
            CanonicalStage::from_raw("result_rejected"),
            CanonicalStage::Generation
        );
        assert_eq!(
            CanonicalStage::from_raw("client_rejected"),
            CanonicalStage::ResultReview
        );
    }

    #[test]
    fn test_terminal() {
        assert!(CanonicalStage::Published.is_terminal());
        assert!(!CanonicalStage::PublishReady.is_terminal());
    }
}
