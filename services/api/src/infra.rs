use chrono::{Datelike, Local};
use leaps::records::{
    Achievement, AchievementDraft, ActivityService, ActivityServiceError, AttainmentUpdate,
    Collection, ColorTag, DocumentStore, EnrichmentDraft, EnrichmentEvent, LeadershipDraft,
    LeadershipPosition, ParticipationUpdate, ProfileUpdate, PublishError, RecordId,
    RepositoryError, ServiceEvent, ServiceEventDraft, StoredDocument, UpdatePublisher, UserId,
};
use leaps::rules::{Representation, ServiceType};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Documents {
    collections: HashMap<(UserId, Collection), Vec<StoredDocument>>,
    users: HashMap<UserId, Map<String, Value>>,
    sequence: u64,
}

/// Process-local document store. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentStore {
    documents: Arc<Mutex<Documents>>,
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(
        &self,
        user: &UserId,
        collection: Collection,
        body: Value,
    ) -> Result<RecordId, RepositoryError> {
        let mut guard = self.documents.lock().expect("repository mutex poisoned");
        guard.sequence += 1;
        let id = RecordId(format!("{}-{:06}", collection.name(), guard.sequence));
        guard
            .collections
            .entry((user.clone(), collection))
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    fn replace(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
        body: Value,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.documents.lock().expect("repository mutex poisoned");
        match guard
            .collections
            .get_mut(&(user.clone(), collection))
            .and_then(|documents| documents.iter_mut().find(|document| &document.id == id))
        {
            Some(document) => {
                document.body = body;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.documents.lock().expect("repository mutex poisoned");
        let documents = guard
            .collections
            .get_mut(&(user.clone(), collection))
            .ok_or(RepositoryError::NotFound)?;
        let position = documents
            .iter()
            .position(|document| &document.id == id)
            .ok_or(RepositoryError::NotFound)?;
        documents.remove(position);
        Ok(())
    }

    fn list(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError> {
        let guard = self.documents.lock().expect("repository mutex poisoned");
        Ok(guard
            .collections
            .get(&(user.clone(), collection))
            .cloned()
            .unwrap_or_default())
    }

    fn user_document(&self, user: &UserId) -> Result<Option<Map<String, Value>>, RepositoryError> {
        let guard = self.documents.lock().expect("repository mutex poisoned");
        Ok(guard.users.get(user).cloned())
    }

    fn merge_user_document(
        &self,
        user: &UserId,
        fields: Map<String, Value>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.documents.lock().expect("repository mutex poisoned");
        guard.users.entry(user.clone()).or_default().extend(fields);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryUpdatePublisher {
    events: Arc<Mutex<Vec<AttainmentUpdate>>>,
}

impl UpdatePublisher for InMemoryUpdatePublisher {
    fn publish(&self, update: AttainmentUpdate) -> Result<(), PublishError> {
        debug!(
            user = %update.user,
            domain = update.domain.label(),
            level = %update.domain_level,
            "attainment update queued"
        );
        let mut guard = self.events.lock().expect("publisher mutex poisoned");
        guard.push(update);
        Ok(())
    }
}

impl InMemoryUpdatePublisher {
    pub(crate) fn events(&self) -> Vec<AttainmentUpdate> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

pub(crate) type InMemoryActivityService =
    ActivityService<InMemoryDocumentStore, InMemoryUpdatePublisher>;

pub(crate) fn in_memory_service() -> (Arc<InMemoryActivityService>, InMemoryUpdatePublisher) {
    let publisher = InMemoryUpdatePublisher::default();
    let service = ActivityService::new(
        Arc::new(InMemoryDocumentStore::default()),
        Arc::new(publisher.clone()),
    );
    (Arc::new(service), publisher)
}

/// Populate one student with a representative spread of records.
pub(crate) fn seed_demo_student(
    service: &InMemoryActivityService,
    user: &UserId,
) -> Result<(), ActivityServiceError> {
    let today = Local::now().date_naive();

    service.update_profile(
        user,
        ProfileUpdate {
            name: Some("Demo Student".to_string()),
            year: Some(today.year()),
            house: Some("Blue".to_string()),
            cca: Some("Robotics Club".to_string()),
            ..ProfileUpdate::default()
        },
    )?;

    for name in ["Class Exco", "Senior CCA Exco"] {
        service.add_record::<LeadershipPosition>(
            user,
            LeadershipDraft {
                name: name.to_string(),
                year: today.year(),
            },
        )?;
    }

    for (name, representation, year) in [
        ("National Robotics Competition", Representation::National, "1 year"),
        ("Zonal Science Quiz", Representation::SchoolExternal, "1 year"),
        ("Regional Coding Challenge", Representation::SchoolExternal, "2 years"),
    ] {
        service.add_record::<Achievement>(
            user,
            AchievementDraft {
                name: name.to_string(),
                award: "Merit".to_string(),
                representation,
                year: year.to_string(),
            },
        )?;
    }

    for (name, hours, kind) in [
        ("Community garden", 18, ServiceType::Via),
        ("Library reading buddies", 12, ServiceType::Others),
    ] {
        service.add_record::<ServiceEvent>(
            user,
            ServiceEventDraft {
                name: name.to_string(),
                hours,
                kind,
            },
        )?;
    }

    service.update_participation(
        user,
        ParticipationUpdate {
            attendance_percent: 88,
            years_in_cca: 3,
        },
    )?;

    service.add_record::<EnrichmentEvent>(
        user,
        EnrichmentDraft {
            name: "Science Centre learning journey".to_string(),
            date: today,
            color: ColorTag::default(),
        },
    )?;

    Ok(())
}
