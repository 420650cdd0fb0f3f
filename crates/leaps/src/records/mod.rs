//! Student activity records, their document-store seam, and the service that
//! keeps domain levels and the attainment rating current after every write.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Achievement, AchievementDraft, ActivityRecord, Collection, ColorTag, EnrichmentDraft,
    EnrichmentEvent, InvalidRecord, LeadershipDraft, LeadershipPosition, ParticipationRecord,
    ParticipationUpdate, ProfileUpdate, RecordId, ServiceEvent, ServiceEventDraft,
    StudentProfile, UserId,
};
pub use repository::{
    AttainmentUpdate, DocumentStore, PublishError, RepositoryError, StoredDocument,
    UpdatePublisher,
};
pub use router::activity_router;
pub use service::{ActivityService, ActivityServiceError, AttainmentReport, RecordMutation};
