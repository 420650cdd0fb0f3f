use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::records::domain::{
    AchievementDraft, Collection, ColorTag, EnrichmentDraft, LeadershipDraft, RecordId,
    ServiceEventDraft, UserId,
};
use crate::records::repository::{
    AttainmentUpdate, DocumentStore, PublishError, RepositoryError, StoredDocument,
    UpdatePublisher,
};
use crate::records::{activity_router, ActivityService};
use crate::rules::{Representation, ServiceType};

pub(super) fn student() -> UserId {
    UserId("student-42".to_string())
}

pub(super) fn leadership(name: &str) -> LeadershipDraft {
    LeadershipDraft {
        name: name.to_string(),
        year: 2024,
    }
}

pub(super) fn achievement(representation: Representation, year: &str) -> AchievementDraft {
    AchievementDraft {
        name: "Inter-school Robotics".to_string(),
        award: "Gold".to_string(),
        representation,
        year: year.to_string(),
    }
}

pub(super) fn service_event(hours: u32, kind: ServiceType) -> ServiceEventDraft {
    ServiceEventDraft {
        name: "Community garden".to_string(),
        hours,
        kind,
    }
}

pub(super) fn enrichment(name: &str) -> EnrichmentDraft {
    EnrichmentDraft {
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        color: ColorTag::default(),
    }
}

pub(super) fn build_service() -> (
    ActivityService<MemoryStore, RecordingPublisher>,
    Arc<MemoryStore>,
    Arc<RecordingPublisher>,
) {
    let store = Arc::new(MemoryStore::default());
    let publisher = Arc::new(RecordingPublisher::default());
    let service = ActivityService::new(store.clone(), publisher.clone());
    (service, store, publisher)
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<(UserId, Collection), Vec<StoredDocument>>,
    users: HashMap<UserId, Map<String, Value>>,
    next_id: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Write a document verbatim, bypassing the service.
    pub(super) fn put_raw(&self, user: &UserId, collection: Collection, id: &str, body: Value) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .collections
            .entry((user.clone(), collection))
            .or_default()
            .push(StoredDocument {
                id: RecordId(id.to_string()),
                body,
            });
    }

    pub(super) fn raw(&self, user: &UserId, collection: Collection) -> Vec<StoredDocument> {
        let state = self.state.lock().expect("store mutex poisoned");
        state
            .collections
            .get(&(user.clone(), collection))
            .cloned()
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    fn insert(
        &self,
        user: &UserId,
        collection: Collection,
        body: Value,
    ) -> Result<RecordId, RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.next_id += 1;
        let id = RecordId(format!("{}-{:06}", collection.name(), state.next_id));
        state
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
        let mut state = self.state.lock().expect("store mutex poisoned");
        let document = state
            .collections
            .get_mut(&(user.clone(), collection))
            .and_then(|documents| documents.iter_mut().find(|document| &document.id == id))
            .ok_or(RepositoryError::NotFound)?;
        document.body = body;
        Ok(())
    }

    fn delete(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let documents = state
            .collections
            .get_mut(&(user.clone(), collection))
            .ok_or(RepositoryError::NotFound)?;
        let before = documents.len();
        documents.retain(|document| &document.id != id);
        if documents.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn list(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError> {
        Ok(self.raw(user, collection))
    }

    fn user_document(&self, user: &UserId) -> Result<Option<Map<String, Value>>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.users.get(user).cloned())
    }

    fn merge_user_document(
        &self,
        user: &UserId,
        fields: Map<String, Value>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.users.entry(user.clone()).or_default().extend(fields);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingPublisher {
    events: Arc<Mutex<Vec<AttainmentUpdate>>>,
}

impl RecordingPublisher {
    pub(super) fn events(&self) -> Vec<AttainmentUpdate> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl UpdatePublisher for RecordingPublisher {
    fn publish(&self, update: AttainmentUpdate) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("publisher mutex poisoned")
            .push(update);
        Ok(())
    }
}

pub(super) struct OfflinePublisher;

impl UpdatePublisher for OfflinePublisher {
    fn publish(&self, _update: AttainmentUpdate) -> Result<(), PublishError> {
        Err(PublishError::Transport("push gateway offline".to_string()))
    }
}

/// Store whose inserts always collide with an existing document.
pub(super) struct ConflictStore;

impl DocumentStore for ConflictStore {
    fn insert(
        &self,
        _user: &UserId,
        _collection: Collection,
        _body: Value,
    ) -> Result<RecordId, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn replace(
        &self,
        _user: &UserId,
        _collection: Collection,
        _id: &RecordId,
        _body: Value,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn delete(
        &self,
        _user: &UserId,
        _collection: Collection,
        _id: &RecordId,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list(
        &self,
        _user: &UserId,
        _collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError> {
        Ok(Vec::new())
    }

    fn user_document(&self, _user: &UserId) -> Result<Option<Map<String, Value>>, RepositoryError> {
        Ok(None)
    }

    fn merge_user_document(
        &self,
        _user: &UserId,
        _fields: Map<String, Value>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    fn insert(
        &self,
        _user: &UserId,
        _collection: Collection,
        _body: Value,
    ) -> Result<RecordId, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn replace(
        &self,
        _user: &UserId,
        _collection: Collection,
        _id: &RecordId,
        _body: Value,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn delete(
        &self,
        _user: &UserId,
        _collection: Collection,
        _id: &RecordId,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn list(
        &self,
        _user: &UserId,
        _collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn user_document(&self, _user: &UserId) -> Result<Option<Map<String, Value>>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn merge_user_document(
        &self,
        _user: &UserId,
        _fields: Map<String, Value>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: ActivityService<MemoryStore, RecordingPublisher>,
) -> axum::Router {
    activity_router(Arc::new(service))
}
