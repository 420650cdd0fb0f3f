use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    Achievement, ActivityRecord, EnrichmentEvent, LeadershipPosition, ParticipationUpdate,
    ProfileUpdate, RecordId, ServiceEvent, UserId,
};
use super::repository::{DocumentStore, UpdatePublisher};
use super::service::{ActivityService, ActivityServiceError};
use crate::error::AppError;
use crate::rules::{
    compute_attainment, level_guide, positions_for_category, AttainmentRating, DomainLevels,
    Level, LevelDistribution, LevelError,
};

type SharedService<S, P> = Arc<ActivityService<S, P>>;

/// Router exposing record CRUD, participation, profile, and attainment endpoints.
pub fn activity_router<S, P>(service: SharedService<S, P>) -> Router
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    let router = Router::new();
    let router = collection_routes::<LeadershipPosition, S, P>(router, "leadership");
    let router = collection_routes::<Achievement, S, P>(router, "achievements");
    let router = collection_routes::<ServiceEvent, S, P>(router, "service-events");
    let router = collection_routes::<EnrichmentEvent, S, P>(router, "enrichments");

    router
        .route(
            "/api/v1/users/:user_id/participation",
            get(participation_handler::<S, P>).put(update_participation_handler::<S, P>),
        )
        .route(
            "/api/v1/users/:user_id/profile",
            get(profile_handler::<S, P>).put(update_profile_handler::<S, P>),
        )
        .route(
            "/api/v1/users/:user_id/attainment",
            get(report_handler::<S, P>),
        )
        .route("/api/v1/attainment/evaluate", post(evaluate_handler))
        .route("/api/v1/levels/guide", get(guide_handler))
        .route(
            "/api/v1/leadership/categories/:category",
            get(category_handler),
        )
        .with_state(service)
}

fn collection_routes<T, S, P>(
    router: Router<SharedService<S, P>>,
    segment: &str,
) -> Router<SharedService<S, P>>
where
    T: ActivityRecord,
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    router
        .route(
            &format!("/api/v1/users/:user_id/{segment}"),
            get(list_handler::<T, S, P>).post(add_handler::<T, S, P>),
        )
        .route(
            &format!("/api/v1/users/:user_id/{segment}/:record_id"),
            put(update_handler::<T, S, P>).delete(remove_handler::<T, S, P>),
        )
}

pub(crate) async fn list_handler<T, S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    T: ActivityRecord,
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    match service.records::<T>(&UserId(user_id)) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn add_handler<T, S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
    payload: Result<Json<T::Draft>, JsonRejection>,
) -> Response
where
    T: ActivityRecord,
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    match service.add_record::<T>(&UserId(user_id), draft) {
        Ok(mutation) => (StatusCode::CREATED, Json(mutation)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_handler<T, S, P>(
    State(service): State<SharedService<S, P>>,
    Path((user_id, record_id)): Path<(String, String)>,
    payload: Result<Json<T::Draft>, JsonRejection>,
) -> Response
where
    T: ActivityRecord,
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    match service.update_record::<T>(&UserId(user_id), &RecordId(record_id), draft) {
        Ok(mutation) => (StatusCode::OK, Json(mutation)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn remove_handler<T, S, P>(
    State(service): State<SharedService<S, P>>,
    Path((user_id, record_id)): Path<(String, String)>,
) -> Response
where
    T: ActivityRecord,
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    match service.remove_record::<T>(&UserId(user_id), &RecordId(record_id)) {
        Ok(mutation) => (StatusCode::OK, Json(mutation)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn participation_handler<S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    match service.participation(&UserId(user_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_participation_handler<S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
    payload: Result<Json<ParticipationUpdate>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    match service.update_participation(&UserId(user_id), update) {
        Ok(mutation) => (StatusCode::OK, Json(mutation)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn profile_handler<S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    match service.profile(&UserId(user_id)) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_profile_handler<S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    match service.update_profile(&UserId(user_id), update) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn report_handler<S, P>(
    State(service): State<SharedService<S, P>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
    P: UpdatePublisher + 'static,
{
    match service.report(&UserId(user_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => failure(error),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationView {
    levels: DomainLevels,
    rating: AttainmentRating,
    summary: String,
    distribution: LevelDistribution,
}

/// Raw levels as submitted; range checks happen in [`Level::new`].
#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    leadership: u8,
    achievement: u8,
    participation: u8,
    service: u8,
}

impl TryFrom<EvaluationRequest> for DomainLevels {
    type Error = LevelError;

    fn try_from(request: EvaluationRequest) -> Result<Self, Self::Error> {
        Ok(DomainLevels {
            leadership: Level::new(request.leadership)?,
            achievement: Level::new(request.achievement)?,
            participation: Level::new(request.participation)?,
            service: Level::new(request.service)?,
        })
    }
}

pub(crate) async fn evaluate_handler(
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    let levels = match DomainLevels::try_from(request) {
        Ok(levels) => levels,
        Err(error) => return AppError::Level(error).into_response(),
    };

    let rating = compute_attainment(&levels);
    let view = EvaluationView {
        levels,
        rating,
        summary: rating.summary(),
        distribution: levels.distribution(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn guide_handler() -> Response {
    (StatusCode::OK, Json(level_guide())).into_response()
}

pub(crate) async fn category_handler(Path(category): Path<String>) -> Response {
    let positions = positions_for_category(&category);
    let payload = json!({
        "category": category,
        "positions": positions,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

fn failure(error: ActivityServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status(), Json(payload)).into_response()
}

/// Malformed or mistyped request bodies keep the JSON error shape.
fn rejected(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), Json(payload)).into_response()
}
