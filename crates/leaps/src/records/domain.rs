use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rules::{
    achievement_level, classify_leadership_level, classify_participation_domain, Domain, Level,
    Representation, ServiceType,
};

/// Identity of the student whose records are being read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned key of a record inside one of the user's collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sub-collections hanging off the user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Leadership,
    Achievements,
    ServiceEvents,
    Enrichments,
}

impl Collection {
    pub const fn name(self) -> &'static str {
        match self {
            Collection::Leadership => "leadership",
            Collection::Achievements => "achievements",
            Collection::ServiceEvents => "serviceEvents",
            Collection::Enrichments => "enrichments",
        }
    }
}

/// Submitted record failed basic shape checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecord {
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

/// A record type stored in one of the user's collections.
///
/// Records are built from a draft plus the store-assigned id, and derived
/// fields are recomputed at that point. Stored derived values are ignored.
pub trait ActivityRecord: Clone + Serialize + Send + Sync + 'static {
    type Draft: Serialize + serde::de::DeserializeOwned + Send + 'static;

    const COLLECTION: Collection;
    /// Domain whose level depends on this collection, if any.
    const DOMAIN: Option<Domain>;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    fn validate(draft: &Self::Draft) -> Result<(), InvalidRecord>;

    /// Fields written next to the draft for readers that expect them.
    fn derived_fields(_draft: &Self::Draft) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }

    /// Listing order; storage order unless overridden.
    fn sort(_records: &mut [Self]) {}
}

fn require_text(value: &str, field: &'static str) -> Result<(), InvalidRecord> {
    if value.trim().is_empty() {
        Err(InvalidRecord::Blank(field))
    } else {
        Ok(())
    }
}

fn level_field(level: Level) -> serde_json::Map<String, serde_json::Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("level".to_string(), serde_json::Value::from(level.value()));
    fields
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadershipDraft {
    pub name: String,
    pub year: i32,
}

/// A leadership role; `level` always follows from `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadershipPosition {
    pub id: RecordId,
    pub name: String,
    pub year: i32,
    pub level: Level,
}

impl ActivityRecord for LeadershipPosition {
    type Draft = LeadershipDraft;

    const COLLECTION: Collection = Collection::Leadership;
    const DOMAIN: Option<Domain> = Some(Domain::Leadership);

    fn from_draft(id: RecordId, draft: LeadershipDraft) -> Self {
        let level = classify_leadership_level(&draft.name);
        Self {
            id,
            name: draft.name,
            year: draft.year,
            level,
        }
    }

    fn validate(draft: &LeadershipDraft) -> Result<(), InvalidRecord> {
        require_text(&draft.name, "name")
    }

    fn derived_fields(draft: &LeadershipDraft) -> serde_json::Map<String, serde_json::Value> {
        level_field(classify_leadership_level(&draft.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDraft {
    pub name: String,
    #[serde(default)]
    pub award: String,
    pub representation: Representation,
    /// Duration label such as "1 year" or "3 or more years".
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: RecordId,
    pub name: String,
    pub award: String,
    pub representation: Representation,
    pub level: Level,
    pub year: String,
}

impl ActivityRecord for Achievement {
    type Draft = AchievementDraft;

    const COLLECTION: Collection = Collection::Achievements;
    const DOMAIN: Option<Domain> = Some(Domain::Achievement);

    fn from_draft(id: RecordId, draft: AchievementDraft) -> Self {
        let level = achievement_level(&draft.representation);
        Self {
            id,
            name: draft.name,
            award: draft.award,
            representation: draft.representation,
            level,
            year: draft.year,
        }
    }

    fn validate(draft: &AchievementDraft) -> Result<(), InvalidRecord> {
        require_text(&draft.name, "name")
    }

    fn derived_fields(draft: &AchievementDraft) -> serde_json::Map<String, serde_json::Value> {
        level_field(achievement_level(&draft.representation))
    }

    fn sort(records: &mut [Self]) {
        records.sort_by(|a, b| b.level.cmp(&a.level));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEventDraft {
    pub name: String,
    pub hours: u32,
    #[serde(rename = "type", default)]
    pub kind: ServiceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEvent {
    pub id: RecordId,
    pub name: String,
    pub hours: u32,
    #[serde(rename = "type")]
    pub kind: ServiceType,
}

impl ActivityRecord for ServiceEvent {
    type Draft = ServiceEventDraft;

    const COLLECTION: Collection = Collection::ServiceEvents;
    const DOMAIN: Option<Domain> = Some(Domain::Service);

    fn from_draft(id: RecordId, draft: ServiceEventDraft) -> Self {
        Self {
            id,
            name: draft.name,
            hours: draft.hours,
            kind: draft.kind,
        }
    }

    fn validate(draft: &ServiceEventDraft) -> Result<(), InvalidRecord> {
        require_text(&draft.name, "name")
    }
}

/// ARGB colour used to tag an enrichment event on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(pub u32);

impl ColorTag {
    pub const LIGHT_BLUE: ColorTag = ColorTag(0xFFAD_D8E6);
}

impl Default for ColorTag {
    fn default() -> Self {
        Self::LIGHT_BLUE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentDraft {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub color: ColorTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentEvent {
    pub id: RecordId,
    pub name: String,
    pub date: NaiveDate,
    pub color: ColorTag,
}

impl ActivityRecord for EnrichmentEvent {
    type Draft = EnrichmentDraft;

    const COLLECTION: Collection = Collection::Enrichments;
    const DOMAIN: Option<Domain> = None;

    fn from_draft(id: RecordId, draft: EnrichmentDraft) -> Self {
        Self {
            id,
            name: draft.name,
            date: draft.date,
            color: draft.color,
        }
    }

    fn validate(draft: &EnrichmentDraft) -> Result<(), InvalidRecord> {
        require_text(&draft.name, "name")
    }
}

pub(crate) const PARTICIPATION_ATTENDANCE_FIELD: &str = "participationAttendance";
pub(crate) const PARTICIPATION_YEARS_FIELD: &str = "participationYear";

/// CCA attendance and tenure, kept on the user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParticipationRecord {
    pub attendance_percent: u32,
    pub years_in_cca: u32,
    pub level: Level,
}

impl ParticipationRecord {
    pub fn new(attendance_percent: u32, years_in_cca: u32) -> Self {
        Self {
            attendance_percent,
            years_in_cca,
            level: classify_participation_domain(attendance_percent, years_in_cca),
        }
    }
}

impl Default for ParticipationRecord {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationUpdate {
    pub attendance_percent: u32,
    pub years_in_cca: u32,
}

/// Descriptive profile fields stored on the user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub year: i32,
    pub house: String,
    pub cca: String,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            name: "My Name".to_string(),
            email: None,
            year: 2025,
            house: "My House".to_string(),
            cca: "My CCA".to_string(),
        }
    }
}

/// Partial profile edit; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cca: Option<String>,
}
