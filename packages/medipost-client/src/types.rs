//! Medipost API request and response types.
//!
//! Payload shapes are owned by the backend and versioned there; every field
//! that has ever been observed missing in production responses is `Option` or
//! defaulted, so a thinner payload deserializes instead of failing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Workflow view (consolidated snapshot)
// =============================================================================

/// Consolidated workflow snapshot for one post.
///
/// Assembled server-side and fetched as one unit. The client treats it as an
/// immutable value per fetch and replaces it wholesale on refresh; it is
/// never patched field-by-field. Absent sections are a normal steady state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowView {
    pub post_id: String,

    /// Raw lifecycle status code as the backend reports it.
    pub status: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub publish_date: Option<NaiveDate>,

    #[serde(default)]
    pub hospital: Option<HospitalInfo>,

    #[serde(default)]
    pub campaign: Option<CampaignInfo>,

    #[serde(default)]
    pub material: Option<MaterialInfo>,

    #[serde(default)]
    pub clinical_context: Option<ClinicalContext>,

    /// Prior publish-schedule entries for the campaign, soonest first.
    #[serde(default)]
    pub publish_schedule: Vec<ScheduleEntry>,
}

/// Hospital reference data (owned and mutated elsewhere).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Campaign reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_post_count: Option<u32>,
}

/// Treatment and source-material references for the post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialInfo {
    pub treatment_name: String,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
}

/// One uploaded source material (image, document, before/after photo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Clinical reference data used while reviewing generated content.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClinicalContext {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub procedures: Vec<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
}

/// One publish-schedule entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub post_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
}

// =============================================================================
// Guide input
// =============================================================================

/// Everything needed to edit a post's writing guide: option catalogs plus the
/// currently saved values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideInput {
    #[serde(default)]
    pub persona_options: Vec<PersonaOption>,

    #[serde(default)]
    pub emoji_options: Vec<EmojiLevelOption>,

    /// Currently selected persona id, if any.
    #[serde(default)]
    pub selected_persona: Option<String>,

    #[serde(default)]
    pub emoji_level: Option<u8>,

    #[serde(default)]
    pub keywords: KeywordSets,

    #[serde(default)]
    pub writing_guide: String,
}

/// A selectable writing persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One emoji-intensity level and its usage-guide description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiLevelOption {
    pub level: u8,
    pub usage_guide: String,
}

/// The six named keyword sets of a writing guide.
///
/// Order is irrelevant and entries are unique; the workflow layer enforces
/// trimming and dedup before these ever reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSets {
    #[serde(default)]
    pub region: Vec<String>,
    #[serde(default)]
    pub hospital: Vec<String>,
    #[serde(default)]
    pub symptom: Vec<String>,
    #[serde(default)]
    pub procedure: Vec<String>,
    #[serde(default)]
    pub treatment: Vec<String>,
    #[serde(default)]
    pub target: Vec<String>,
}

// =============================================================================
// Mutation requests
// =============================================================================

/// Persona selection update (idempotent, last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaUpdate {
    pub persona_id: String,
}

/// Keyword-guide update: six sets, free-text guide, and the completion flag.
///
/// The completion flag is request-supplied, not server-inferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGuideUpdate {
    pub keywords: KeywordSets,
    pub writing_guide: String,
    pub completed: bool,
}

/// Emoji-intensity update (idempotent, last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiLevelUpdate {
    pub level: u8,
}

/// Post status transition with an optional free-text note.
///
/// Not idempotent; the caller must invoke it once per logical transition.
/// The server is authoritative on whether the transition is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Manual content edit (idempotent, last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

/// Publish scheduling request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSchedule {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
}

// =============================================================================
// Pipeline queue
// =============================================================================

/// Snapshot of the AI generation queue, for the polling monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStatus {
    #[serde(default)]
    pub waiting: u32,
    #[serde(default)]
    pub processing: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub lanes: Vec<QueueLane>,
}

/// One processing lane of the generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueLane {
    pub name: String,
    pub active: u32,
    pub capacity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_view_tolerates_missing_sections() {
        // The backend routinely omits sections that have no data yet.
        let json = r#"{"post_id": "p-1", "status": "initial"}"#;
        let view: WorkflowView = serde_json::from_str(json).unwrap();

        assert_eq!(view.post_id, "p-1");
        assert_eq!(view.status, "initial");
        assert!(view.hospital.is_none());
        assert!(view.material.is_none());
        assert!(view.publish_schedule.is_empty());
    }

    #[test]
    fn test_guide_input_defaults() {
        let json = r#"{}"#;
        let input: GuideInput = serde_json::from_str(json).unwrap();

        assert!(input.persona_options.is_empty());
        assert!(input.selected_persona.is_none());
        assert_eq!(input.keywords, KeywordSets::default());
        assert!(input.writing_guide.is_empty());
    }

    #[test]
    fn test_status_update_skips_absent_note() {
        let update = StatusUpdate {
            status: "material_review_completed".to_string(),
            note: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(!json.contains("note"));
    }
}
