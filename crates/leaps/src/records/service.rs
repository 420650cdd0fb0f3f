use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::domain::{
    Achievement, ActivityRecord, EnrichmentEvent, InvalidRecord, LeadershipPosition,
    ParticipationRecord, ParticipationUpdate, ProfileUpdate, RecordId, ServiceEvent,
    StudentProfile, UserId, PARTICIPATION_ATTENDANCE_FIELD, PARTICIPATION_YEARS_FIELD,
};
use super::repository::{
    AttainmentUpdate, DocumentStore, PublishError, RepositoryError, StoredDocument,
    UpdatePublisher,
};
use crate::rules::{
    compute_attainment, current_leadership, validate_participation, AchievementTally,
    AttainmentRating, CurrentLeadership, Domain, DomainLevels, LevelDistribution,
    ParticipationError, ServiceTally,
};

/// Service composing the document store, the rules engine, and update fan-out.
///
/// Every call names the student explicitly; there is no ambient session.
pub struct ActivityService<S, P> {
    store: Arc<S>,
    publisher: Arc<P>,
}

/// Result of a write: the record as it now reads (absent for deletes) and the
/// recomputed rating when the collection feeds a domain level.
#[derive(Debug, Clone, Serialize)]
pub struct RecordMutation<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<AttainmentUpdate>,
}

/// Everything the attainment screen shows for one student.
#[derive(Debug, Clone, Serialize)]
pub struct AttainmentReport {
    pub user: UserId,
    pub profile: StudentProfile,
    pub levels: DomainLevels,
    pub rating: AttainmentRating,
    pub distribution: LevelDistribution,
    pub leadership: CurrentLeadership,
    pub achievements: AchievementTally,
    pub service: ServiceTally,
    pub participation: ParticipationRecord,
    pub enrichment_count: usize,
}

struct DomainSnapshot {
    leadership: CurrentLeadership,
    achievements: AchievementTally,
    service: ServiceTally,
    participation: ParticipationRecord,
}

impl DomainSnapshot {
    fn levels(&self) -> DomainLevels {
        DomainLevels {
            leadership: self.leadership.level,
            achievement: self.achievements.level(),
            participation: self.participation.level,
            service: self.service.level(),
        }
    }
}

impl<S, P> ActivityService<S, P>
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self {
        Self { store, publisher }
    }

    /// Current records of one collection, decoded and with derived fields recomputed.
    pub fn records<T: ActivityRecord>(
        &self,
        user: &UserId,
    ) -> Result<Vec<T>, ActivityServiceError> {
        let documents = self.store.list(user, T::COLLECTION)?;
        let mut records: Vec<T> = documents
            .into_iter()
            .filter_map(|document| decode::<T>(user, document))
            .collect();
        T::sort(&mut records);
        Ok(records)
    }

    pub fn add_record<T: ActivityRecord>(
        &self,
        user: &UserId,
        draft: T::Draft,
    ) -> Result<RecordMutation<T>, ActivityServiceError> {
        T::validate(&draft)?;
        let body = encode::<T>(&draft)?;
        let id = self.store.insert(user, T::COLLECTION, body)?;
        info!(user = %user, collection = T::COLLECTION.name(), record = %id, "record added");

        let record = T::from_draft(id, draft);
        let update = self.after_mutation::<T>(user)?;
        Ok(RecordMutation {
            record: Some(record),
            update,
        })
    }

    /// Replace a record wholesale. Last write wins.
    pub fn update_record<T: ActivityRecord>(
        &self,
        user: &UserId,
        id: &RecordId,
        draft: T::Draft,
    ) -> Result<RecordMutation<T>, ActivityServiceError> {
        T::validate(&draft)?;
        let body = encode::<T>(&draft)?;
        self.store.replace(user, T::COLLECTION, id, body)?;
        info!(user = %user, collection = T::COLLECTION.name(), record = %id, "record replaced");

        let record = T::from_draft(id.clone(), draft);
        let update = self.after_mutation::<T>(user)?;
        Ok(RecordMutation {
            record: Some(record),
            update,
        })
    }

    pub fn remove_record<T: ActivityRecord>(
        &self,
        user: &UserId,
        id: &RecordId,
    ) -> Result<RecordMutation<T>, ActivityServiceError> {
        self.store.delete(user, T::COLLECTION, id)?;
        info!(user = %user, collection = T::COLLECTION.name(), record = %id, "record removed");

        let update = self.after_mutation::<T>(user)?;
        Ok(RecordMutation {
            record: None,
            update,
        })
    }

    pub fn participation(
        &self,
        user: &UserId,
    ) -> Result<ParticipationRecord, ActivityServiceError> {
        let document = self.store.user_document(user)?.unwrap_or_default();
        let read = |field: &str, fallback: u32| {
            document
                .get(field)
                .and_then(Value::as_u64)
                .and_then(|value| u32::try_from(value).ok())
                .unwrap_or(fallback)
        };
        let defaults = ParticipationRecord::default();
        Ok(ParticipationRecord::new(
            read(PARTICIPATION_ATTENDANCE_FIELD, defaults.attendance_percent),
            read(PARTICIPATION_YEARS_FIELD, defaults.years_in_cca),
        ))
    }

    /// Validate and store new attendance/tenure. Out-of-range input writes nothing.
    pub fn update_participation(
        &self,
        user: &UserId,
        update: ParticipationUpdate,
    ) -> Result<RecordMutation<ParticipationRecord>, ActivityServiceError> {
        validate_participation(update.attendance_percent, update.years_in_cca)?;

        let mut fields = Map::new();
        fields.insert(
            PARTICIPATION_ATTENDANCE_FIELD.to_string(),
            Value::from(update.attendance_percent),
        );
        fields.insert(
            PARTICIPATION_YEARS_FIELD.to_string(),
            Value::from(update.years_in_cca),
        );
        self.store.merge_user_document(user, fields)?;
        info!(
            user = %user,
            attendance = update.attendance_percent,
            years = update.years_in_cca,
            "participation updated"
        );

        let record = ParticipationRecord::new(update.attendance_percent, update.years_in_cca);
        let update = self.recompute(user, Domain::Participation)?;
        Ok(RecordMutation {
            record: Some(record),
            update: Some(update),
        })
    }

    pub fn profile(&self, user: &UserId) -> Result<StudentProfile, ActivityServiceError> {
        let document = self.store.user_document(user)?.unwrap_or_default();
        let mut profile = StudentProfile::default();

        if let Some(name) = document.get("name").and_then(Value::as_str) {
            profile.name = name.to_string();
        }
        if let Some(email) = document.get("email").and_then(Value::as_str) {
            profile.email = Some(email.to_string());
        }
        if let Some(year) = document
            .get("year")
            .and_then(Value::as_i64)
            .and_then(|year| i32::try_from(year).ok())
        {
            profile.year = year;
        }
        if let Some(house) = document.get("house").and_then(Value::as_str) {
            profile.house = house.to_string();
        }
        if let Some(cca) = document.get("cca").and_then(Value::as_str) {
            profile.cca = cca.to_string();
        }

        Ok(profile)
    }

    pub fn update_profile(
        &self,
        user: &UserId,
        update: ProfileUpdate,
    ) -> Result<StudentProfile, ActivityServiceError> {
        let fields = match serde_json::to_value(&update)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        if !fields.is_empty() {
            self.store.merge_user_document(user, fields)?;
            info!(user = %user, "profile updated");
        }
        self.profile(user)
    }

    pub fn domain_levels(&self, user: &UserId) -> Result<DomainLevels, ActivityServiceError> {
        Ok(self.snapshot(user)?.levels())
    }

    pub fn report(&self, user: &UserId) -> Result<AttainmentReport, ActivityServiceError> {
        let snapshot = self.snapshot(user)?;
        let levels = snapshot.levels();
        let enrichment_count = self.records::<EnrichmentEvent>(user)?.len();

        Ok(AttainmentReport {
            user: user.clone(),
            profile: self.profile(user)?,
            levels,
            rating: compute_attainment(&levels),
            distribution: levels.distribution(),
            leadership: snapshot.leadership,
            achievements: snapshot.achievements,
            service: snapshot.service,
            participation: snapshot.participation,
            enrichment_count,
        })
    }

    fn snapshot(&self, user: &UserId) -> Result<DomainSnapshot, ActivityServiceError> {
        // Leadership keeps store order, which decides ties for the current position.
        let positions = self.records::<LeadershipPosition>(user)?;
        let achievements = self.records::<Achievement>(user)?;
        let events = self.records::<ServiceEvent>(user)?;

        Ok(DomainSnapshot {
            leadership: current_leadership(positions.iter().map(|position| position.name.as_str())),
            achievements: AchievementTally::from_entries(
                achievements
                    .iter()
                    .map(|achievement| (&achievement.representation, achievement.year.as_str())),
            ),
            service: ServiceTally::from_events(
                events.iter().map(|event| (event.hours, event.kind)),
            ),
            participation: self.participation(user)?,
        })
    }

    fn after_mutation<T: ActivityRecord>(
        &self,
        user: &UserId,
    ) -> Result<Option<AttainmentUpdate>, ActivityServiceError> {
        T::DOMAIN
            .map(|domain| self.recompute(user, domain))
            .transpose()
    }

    fn recompute(
        &self,
        user: &UserId,
        domain: Domain,
    ) -> Result<AttainmentUpdate, ActivityServiceError> {
        let levels = self.domain_levels(user)?;
        let rating = compute_attainment(&levels);
        let update = AttainmentUpdate {
            user: user.clone(),
            domain,
            domain_level: levels.get(domain),
            levels,
            rating,
        };

        info!(
            user = %user,
            domain = domain.label(),
            level = %update.domain_level,
            attainment = rating.state.label(),
            "attainment recomputed"
        );
        self.publisher.publish(update.clone())?;
        Ok(update)
    }
}

fn encode<T: ActivityRecord>(draft: &T::Draft) -> Result<Value, ActivityServiceError> {
    let mut body = match serde_json::to_value(draft)? {
        Value::Object(fields) => fields,
        other => {
            let mut fields = Map::new();
            fields.insert("value".to_string(), other);
            fields
        }
    };
    body.extend(T::derived_fields(draft));
    Ok(Value::Object(body))
}

fn decode<T: ActivityRecord>(user: &UserId, document: StoredDocument) -> Option<T> {
    let StoredDocument { id, body } = document;
    match serde_json::from_value::<T::Draft>(body) {
        Ok(draft) => {
            debug!(user = %user, collection = T::COLLECTION.name(), record = %id, "decoded record");
            Some(T::from_draft(id, draft))
        }
        Err(err) => {
            warn!(
                user = %user,
                collection = T::COLLECTION.name(),
                record = %id,
                error = %err,
                "skipping malformed document"
            );
            None
        }
    }
}

/// Error raised by the activity service.
#[derive(Debug, thiserror::Error)]
pub enum ActivityServiceError {
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecord),
    #[error(transparent)]
    Participation(#[from] ParticipationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("record encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ActivityServiceError {
    /// HTTP status a caller should see for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ActivityServiceError::InvalidRecord(_) | ActivityServiceError::Participation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ActivityServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ActivityServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ActivityServiceError::Repository(RepositoryError::Unavailable(_))
            | ActivityServiceError::Publish(_)
            | ActivityServiceError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
