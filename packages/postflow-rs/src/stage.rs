//! Stage gate: which UI stages a canonical stage permits.
//!
//! The gate is a monotonic staircase: progress never revokes access to a
//! stage already reached. That property is structural here: the permitted
//! set is always a prefix of [`ALL_STAGES`], so a later canonical stage can
//! only extend the prefix. These functions are pure and run on every render.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::status::CanonicalStage;

/// The six interactive stages of the production UI, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiStage {
    MaterialReview,
    GuideProvision,
    AiGeneration,
    ResultReview,
    ClientReview,
    PublishReadiness,
}

/// All UI stages in workflow order. The gate unlocks prefixes of this array.
pub const ALL_STAGES: [UiStage; 6] = [
    UiStage::MaterialReview,
    UiStage::GuideProvision,
    UiStage::AiGeneration,
    UiStage::ResultReview,
    UiStage::ClientReview,
    UiStage::PublishReadiness,
];

impl UiStage {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            UiStage::MaterialReview => "Material review",
            UiStage::GuideProvision => "Guide provision",
            UiStage::AiGeneration => "AI generation",
            UiStage::ResultReview => "Result review",
            UiStage::ClientReview => "Client review",
            UiStage::PublishReadiness => "Publish readiness",
        }
    }

    fn index(self) -> usize {
        match self {
            UiStage::MaterialReview => 0,
            UiStage::GuideProvision => 1,
            UiStage::AiGeneration => 2,
            UiStage::ResultReview => 3,
            UiStage::ClientReview => 4,
            UiStage::PublishReadiness => 5,
        }
    }
}

/// How many stages (counted from the front of [`ALL_STAGES`]) are unlocked.
///
/// Reaching a canonical stage unlocks that stage's panel plus everything
/// before it. `Unknown` unlocks nothing: an unrecognized status gives no
/// basis for letting the user act.
fn unlocked(stage: CanonicalStage) -> usize {
    match stage {
        CanonicalStage::Initial | CanonicalStage::Unknown => 0,
        CanonicalStage::MaterialReview => 1,
        CanonicalStage::GuideProvision => 2,
        CanonicalStage::Generation => 3,
        CanonicalStage::ResultReview => 4,
        CanonicalStage::ClientReview => 5,
        CanonicalStage::PublishReady | CanonicalStage::Published => 6,
    }
}

/// The set of UI stages permitted at the given canonical stage.
pub fn permitted_stages(stage: CanonicalStage) -> HashSet<UiStage> {
    ALL_STAGES.iter().copied().take(unlocked(stage)).collect()
}

/// Allocation-free check for a single stage; the hot path for per-render
/// enablement and for action gating.
pub fn permits(stage: CanonicalStage, ui: UiStage) -> bool {
    ui.index() < unlocked(stage)
}
