//! Guide draft: the locally-held, editable-before-saved writing guide.
//!
//! One draft exists per selected post. Field groups (persona, keywords,
//! emoji) are independently editable and independently savable; cancel
//! reverts a whole group to its last-hydrated snapshot, never partially.
//! Nothing here talks to the network; commits are the orchestrator's job.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use medipost_client::{
    EmojiLevelOption, EmojiLevelUpdate, GuideInput, KeywordGuideUpdate, KeywordSets,
    PersonaOption, PersonaUpdate,
};

/// The six named keyword sets of a writing guide, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSetKind {
    Region,
    Hospital,
    Symptom,
    Procedure,
    Treatment,
    Target,
}

/// All keyword set kinds, for iteration.
pub const ALL_KEYWORD_SETS: [KeywordSetKind; 6] = [
    KeywordSetKind::Region,
    KeywordSetKind::Hospital,
    KeywordSetKind::Symptom,
    KeywordSetKind::Procedure,
    KeywordSetKind::Treatment,
    KeywordSetKind::Target,
];

impl KeywordSetKind {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            KeywordSetKind::Region => "Region",
            KeywordSetKind::Hospital => "Hospital",
            KeywordSetKind::Symptom => "Symptom",
            KeywordSetKind::Procedure => "Procedure",
            KeywordSetKind::Treatment => "Treatment",
            KeywordSetKind::Target => "Target audience",
        }
    }
}

/// Independently editable, independently savable field groups of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Persona,
    /// The six keyword sets plus the free-text writing guide.
    Keywords,
    Emoji,
}

/// The six keyword sets as unique, trimmed entries.
#[derive(Debug, Clone, Default, PartialEq)]
struct KeywordDraft {
    region: BTreeSet<String>,
    hospital: BTreeSet<String>,
    symptom: BTreeSet<String>,
    procedure: BTreeSet<String>,
    treatment: BTreeSet<String>,
    target: BTreeSet<String>,
}

impl KeywordDraft {
    fn get(&self, kind: KeywordSetKind) -> &BTreeSet<String> {
        match kind {
            KeywordSetKind::Region => &self.region,
            KeywordSetKind::Hospital => &self.hospital,
            KeywordSetKind::Symptom => &self.symptom,
            KeywordSetKind::Procedure => &self.procedure,
            KeywordSetKind::Treatment => &self.treatment,
            KeywordSetKind::Target => &self.target,
        }
    }

    fn get_mut(&mut self, kind: KeywordSetKind) -> &mut BTreeSet<String> {
        match kind {
            KeywordSetKind::Region => &mut self.region,
            KeywordSetKind::Hospital => &mut self.hospital,
            KeywordSetKind::Symptom => &mut self.symptom,
            KeywordSetKind::Procedure => &mut self.procedure,
            KeywordSetKind::Treatment => &mut self.treatment,
            KeywordSetKind::Target => &mut self.target,
        }
    }

    /// Build from wire sets, applying the trim/dedup invariant to whatever
    /// the backend sends.
    fn from_wire(sets: &KeywordSets) -> Self {
        let normalize = |values: &[String]| -> BTreeSet<String> {
            values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        };
        Self {
            region: normalize(&sets.region),
            hospital: normalize(&sets.hospital),
            symptom: normalize(&sets.symptom),
            procedure: normalize(&sets.procedure),
            treatment: normalize(&sets.treatment),
            target: normalize(&sets.target),
        }
    }

    fn to_wire(&self) -> KeywordSets {
        let collect = |set: &BTreeSet<String>| set.iter().cloned().collect();
        KeywordSets {
            region: collect(&self.region),
            hospital: collect(&self.hospital),
            symptom: collect(&self.symptom),
            procedure: collect(&self.procedure),
            treatment: collect(&self.treatment),
            target: collect(&self.target),
        }
    }
}

/// The values a draft carries; duplicated as `current` and `baseline` so a
/// cancelled edit can restore the last-hydrated state per group.
#[derive(Debug, Clone, Default, PartialEq)]
struct DraftValues {
    persona: Option<PersonaOption>,
    keywords: KeywordDraft,
    writing_guide: String,
    emoji_level: Option<u8>,
}

/// Per-post editable working copy of the writing guide.
///
/// Created by [`GuideDraft::hydrate`] when a post is selected, discarded when
/// another post is selected, committed (then re-hydrated) on save.
#[derive(Debug, Clone, Default)]
pub struct GuideDraft {
    current: DraftValues,
    baseline: DraftValues,
    edit_mode: HashSet<FieldGroup>,
    dirty: HashSet<FieldGroup>,
    persona_options: Vec<PersonaOption>,
    emoji_options: Vec<EmojiLevelOption>,
}

impl GuideDraft {
    /// Replace the entire draft from a freshly fetched remote representation.
    /// Clears all edit and dirty flags.
    pub fn hydrate(&mut self, input: GuideInput) {
        let persona = input
            .selected_persona
            .as_deref()
            .and_then(|id| input.persona_options.iter().find(|p| p.id == id))
            .cloned();

        let values = DraftValues {
            persona,
            keywords: KeywordDraft::from_wire(&input.keywords),
            writing_guide: input.writing_guide,
            emoji_level: input.emoji_level,
        };

        self.baseline = values.clone();
        self.current = values;
        self.edit_mode.clear();
        self.dirty.clear();
        self.persona_options = input.persona_options;
        self.emoji_options = input.emoji_options;
    }

    // =========================================================================
    // Edit protocol
    // =========================================================================

    /// Switch a field group into edit mode.
    pub fn enter_edit(&mut self, group: FieldGroup) {
        self.edit_mode.insert(group);
    }

    /// Leave edit mode for a group, restoring its last-hydrated values.
    /// All-or-nothing: the whole group reverts, never part of it.
    pub fn cancel_edit(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::Persona => {
                self.current.persona = self.baseline.persona.clone();
            }
            FieldGroup::Keywords => {
                self.current.keywords = self.baseline.keywords.clone();
                self.current.writing_guide = self.baseline.writing_guide.clone();
            }
            FieldGroup::Emoji => {
                self.current.emoji_level = self.baseline.emoji_level;
            }
        }
        self.edit_mode.remove(&group);
        self.dirty.remove(&group);
    }

    pub fn is_editing(&self, group: FieldGroup) -> bool {
        self.edit_mode.contains(&group)
    }

    pub fn is_dirty(&self, group: FieldGroup) -> bool {
        self.dirty.contains(&group)
    }

    // =========================================================================
    // Persona group
    // =========================================================================

    /// Select a persona by id from the fetched option catalog, caching its
    /// display name and description. Returns false if the id is not offered.
    pub fn select_persona(&mut self, persona_id: &str) -> bool {
        match self.persona_options.iter().find(|p| p.id == persona_id) {
            Some(option) => {
                self.current.persona = Some(option.clone());
                self.dirty.insert(FieldGroup::Persona);
                true
            }
            None => false,
        }
    }

    pub fn persona(&self) -> Option<&PersonaOption> {
        self.current.persona.as_ref()
    }

    pub fn persona_options(&self) -> &[PersonaOption] {
        &self.persona_options
    }

    // =========================================================================
    // Keywords group
    // =========================================================================

    /// Add a keyword: trimmed, empty and already-present values are silent
    /// no-ops. Idempotent, matching tag-input add semantics.
    pub fn add_keyword(&mut self, kind: KeywordSetKind, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if self.current.keywords.get_mut(kind).insert(value.to_string()) {
            self.dirty.insert(FieldGroup::Keywords);
        }
    }

    /// Remove a keyword if present; no-op otherwise.
    pub fn remove_keyword(&mut self, kind: KeywordSetKind, value: &str) {
        if self.current.keywords.get_mut(kind).remove(value.trim()) {
            self.dirty.insert(FieldGroup::Keywords);
        }
    }

    pub fn keywords(&self, kind: KeywordSetKind) -> &BTreeSet<String> {
        self.current.keywords.get(kind)
    }

    /// Replace the free-text writing guide (part of the keywords group).
    pub fn set_writing_guide(&mut self, text: impl Into<String>) {
        self.current.writing_guide = text.into();
        self.dirty.insert(FieldGroup::Keywords);
    }

    pub fn writing_guide(&self) -> &str {
        &self.current.writing_guide
    }

    /// The completion gate for the "complete guide provision" transition:
    /// true only when all six keyword sets are non-empty and the writing
    /// guide is non-blank.
    pub fn is_complete(&self) -> bool {
        ALL_KEYWORD_SETS
            .iter()
            .all(|kind| !self.current.keywords.get(*kind).is_empty())
            && !self.current.writing_guide.trim().is_empty()
    }

    // =========================================================================
    // Emoji group
    // =========================================================================

    pub fn set_emoji_level(&mut self, level: u8) {
        self.current.emoji_level = Some(level);
        self.dirty.insert(FieldGroup::Emoji);
    }

    pub fn emoji_level(&self) -> Option<u8> {
        self.current.emoji_level
    }

    /// Usage-guide description for a level, from the fetched catalog.
    pub fn emoji_usage_guide(&self, level: u8) -> Option<&str> {
        self.emoji_options
            .iter()
            .find(|o| o.level == level)
            .map(|o| o.usage_guide.as_str())
    }

    pub fn emoji_options(&self) -> &[EmojiLevelOption] {
        &self.emoji_options
    }

    // =========================================================================
    // Commit payloads
    // =========================================================================

    /// Payload for committing the persona group. `None` when nothing is
    /// selected yet.
    pub fn persona_payload(&self) -> Option<PersonaUpdate> {
        self.current.persona.as_ref().map(|p| PersonaUpdate {
            persona_id: p.id.clone(),
        })
    }

    /// Payload for committing the keywords group. The completion flag is
    /// supplied by the client, per the backend contract.
    pub fn keyword_payload(&self) -> KeywordGuideUpdate {
        KeywordGuideUpdate {
            keywords: self.current.keywords.to_wire(),
            writing_guide: self.current.writing_guide.clone(),
            completed: self.is_complete(),
        }
    }

    /// Payload for committing the emoji group. `None` when no level is set.
    pub fn emoji_payload(&self) -> Option<EmojiLevelUpdate> {
        self.current
            .emoji_level
            .map(|level| EmojiLevelUpdate { level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrated_draft() -> GuideDraft {
        let mut draft = GuideDraft::default();
        draft.hydrate(GuideInput {
            persona_options: vec![
                PersonaOption {
                    id: "warm".to_string(),
                    name: "Warm counselor".to_string(),
                    description: "Friendly, reassuring tone".to_string(),
                },
                PersonaOption {
                    id: "clinical".to_string(),
                    name: "Clinical expert".to_string(),
                    description: "Precise, evidence-forward tone".to_string(),
                },
            ],
            emoji_options: vec![
                EmojiLevelOption {
                    level: 1,
                    usage_guide: "No emoji".to_string(),
                },
                EmojiLevelOption {
                    level: 3,
                    usage_guide: "One per section".to_string(),
                },
            ],
            selected_persona: Some("warm".to_string()),
            emoji_level: Some(1),
            keywords: KeywordSets {
                region: vec!["강남".to_string()],
                ..Default::default()
            },
            writing_guide: String::new(),
        });
        draft
    }

    #[test]
    fn test_hydrate_resolves_persona_and_clears_flags() {
        let draft = hydrated_draft();
        assert_eq!(draft.persona().unwrap().name, "Warm counselor");
        for group in [FieldGroup::Persona, FieldGroup::Keywords, FieldGroup::Emoji] {
            assert!(!draft.is_editing(group));
            assert!(!draft.is_dirty(group));
        }
    }

    #[test]
    fn test_add_keyword_trims_and_dedups() {
        let mut draft = hydrated_draft();

        draft.add_keyword(KeywordSetKind::Symptom, "  치아 통증  ");
        draft.add_keyword(KeywordSetKind::Symptom, "치아 통증");

        let set = draft.keywords(KeywordSetKind::Symptom);
        assert_eq!(set.len(), 1);
        assert!(set.contains("치아 통증"));
    }

    #[test]
    fn test_add_keyword_rejects_empty_silently() {
        let mut draft = hydrated_draft();
        draft.add_keyword(KeywordSetKind::Target, "   ");
        assert!(draft.keywords(KeywordSetKind::Target).is_empty());
        assert!(!draft.is_dirty(FieldGroup::Keywords));
    }

    #[test]
    fn test_duplicate_add_does_not_mark_dirty() {
        let mut draft = hydrated_draft();
        // "강남" came from hydration; re-adding it changes nothing.
        draft.add_keyword(KeywordSetKind::Region, "강남");
        assert!(!draft.is_dirty(FieldGroup::Keywords));
    }

    #[test]
    fn test_remove_keyword_is_noop_when_absent() {
        let mut draft = hydrated_draft();
        draft.remove_keyword(KeywordSetKind::Region, "없는 키워드");
        assert!(!draft.is_dirty(FieldGroup::Keywords));

        draft.remove_keyword(KeywordSetKind::Region, "강남");
        assert!(draft.keywords(KeywordSetKind::Region).is_empty());
        assert!(draft.is_dirty(FieldGroup::Keywords));
    }

    #[test]
    fn test_cancel_edit_restores_whole_group() {
        let mut draft = hydrated_draft();

        draft.enter_edit(FieldGroup::Keywords);
        draft.add_keyword(KeywordSetKind::Hospital, "서울치과");
        draft.set_writing_guide("새 가이드");
        assert!(draft.is_dirty(FieldGroup::Keywords));

        draft.cancel_edit(FieldGroup::Keywords);
        assert!(draft.keywords(KeywordSetKind::Hospital).is_empty());
        assert_eq!(draft.writing_guide(), "");
        assert!(!draft.is_editing(FieldGroup::Keywords));
        assert!(!draft.is_dirty(FieldGroup::Keywords));
    }

    #[test]
    fn test_cancel_edit_leaves_other_groups_alone() {
        let mut draft = hydrated_draft();

        draft.enter_edit(FieldGroup::Persona);
        draft.select_persona("clinical");
        draft.enter_edit(FieldGroup::Emoji);
        draft.set_emoji_level(3);

        draft.cancel_edit(FieldGroup::Persona);
        assert_eq!(draft.persona().unwrap().id, "warm");
        // Emoji edits survive the persona cancel.
        assert_eq!(draft.emoji_level(), Some(3));
        assert!(draft.is_dirty(FieldGroup::Emoji));
    }

    #[test]
    fn test_select_persona_unknown_id_is_rejected() {
        let mut draft = hydrated_draft();
        assert!(!draft.select_persona("nonexistent"));
        assert_eq!(draft.persona().unwrap().id, "warm");
    }

    #[test]
    fn test_is_complete_requires_all_sets_and_guide() {
        let mut draft = hydrated_draft();
        assert!(!draft.is_complete());

        draft.add_keyword(KeywordSetKind::Hospital, "서울치과");
        draft.add_keyword(KeywordSetKind::Symptom, "치아 통증");
        draft.add_keyword(KeywordSetKind::Procedure, "임플란트");
        draft.add_keyword(KeywordSetKind::Treatment, "보철");
        draft.add_keyword(KeywordSetKind::Target, "40대");
        // Guide still blank.
        assert!(!draft.is_complete());

        draft.set_writing_guide("   ");
        assert!(!draft.is_complete());

        draft.set_writing_guide("부드러운 어조로 작성");
        assert!(draft.is_complete());

        draft.remove_keyword(KeywordSetKind::Region, "강남");
        assert!(!draft.is_complete());
    }

    #[test]
    fn test_keyword_payload_carries_completion_flag() {
        let mut draft = hydrated_draft();
        assert!(!draft.keyword_payload().completed);

        for (kind, word) in [
            (KeywordSetKind::Hospital, "서울치과"),
            (KeywordSetKind::Symptom, "치아 통증"),
            (KeywordSetKind::Procedure, "임플란트"),
            (KeywordSetKind::Treatment, "보철"),
            (KeywordSetKind::Target, "40대"),
        ] {
            draft.add_keyword(kind, word);
        }
        draft.set_writing_guide("가이드");

        let payload = draft.keyword_payload();
        assert!(payload.completed);
        assert_eq!(payload.keywords.symptom, vec!["치아 통증".to_string()]);
    }

    #[test]
    fn test_emoji_usage_guide_lookup() {
        let draft = hydrated_draft();
        assert_eq!(draft.emoji_usage_guide(3), Some("One per section"));
        assert_eq!(draft.emoji_usage_guide(9), None);
    }

    #[test]
    fn test_hydrate_normalizes_backend_keywords() {
        let mut draft = GuideDraft::default();
        draft.hydrate(GuideInput {
            persona_options: vec![],
            emoji_options: vec![],
            selected_persona: None,
            emoji_level: None,
            keywords: KeywordSets {
                symptom: vec![" 잇몸 출혈 ".to_string(), "잇몸 출혈".to_string(), "".to_string()],
                ..Default::default()
            },
            writing_guide: String::new(),
        });

        let set = draft.keywords(KeywordSetKind::Symptom);
        assert_eq!(set.len(), 1);
        assert!(set.contains("잇몸 출혈"));
    }
}
