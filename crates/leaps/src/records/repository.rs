use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::{Collection, RecordId, UserId};
use crate::rules::{AttainmentRating, Domain, DomainLevels, Level};

/// Raw document as held by the store, before typed decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: RecordId,
    pub body: Value,
}

/// Per-user document store: one user document plus keyed sub-collections.
///
/// Listing returns documents in the order they were first written.
pub trait DocumentStore: Send + Sync {
    fn insert(
        &self,
        user: &UserId,
        collection: Collection,
        body: Value,
    ) -> Result<RecordId, RepositoryError>;
    fn replace(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
        body: Value,
    ) -> Result<(), RepositoryError>;
    fn delete(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
    ) -> Result<(), RepositoryError>;
    fn list(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, RepositoryError>;
    fn user_document(&self, user: &UserId) -> Result<Option<Map<String, Value>>, RepositoryError>;
    /// Merge `fields` into the user document, creating it when missing.
    fn merge_user_document(
        &self,
        user: &UserId,
        fields: Map<String, Value>,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook told about every recomputed rating (push channels, dashboards).
pub trait UpdatePublisher: Send + Sync {
    fn publish(&self, update: AttainmentUpdate) -> Result<(), PublishError>;
}

/// Levels and rating recomputed after a mutation to `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttainmentUpdate {
    pub user: UserId,
    pub domain: Domain,
    pub domain_level: Level,
    pub levels: DomainLevels,
    pub rating: AttainmentRating,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("update transport unavailable: {0}")]
    Transport(String),
}
