use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::api::response::{ApiError, ApiResult, BookingBody, EventBody};
use crate::api::AppState;
use crate::models::{CreateEvent, UpdateEvent};
use crate::repositories::{BookingRepository, EventRepository};
use crate::validation::booking::parse_event_id;

fn event_not_found(slug: &str) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: format!("Event '{}' not found", slug),
    }
}

pub async fn list_events(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let store = state.db.store().await?;
    let events = EventRepository::new(store.as_ref()).list().await?;

    let events: Vec<EventBody> = events.iter().map(EventBody::from).collect();
    Ok(Json(json!({ "events": events })))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEvent>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let store = state.db.store().await?;
    info!("Creating event '{}'", payload.title.trim());

    let event = EventRepository::new(store.as_ref()).create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "event": EventBody::from(&event) })),
    ))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let store = state.db.store().await?;
    let event = EventRepository::new(store.as_ref())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| event_not_found(&slug))?;

    Ok(Json(json!({ "event": EventBody::from(&event) })))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateEvent>,
) -> ApiResult<impl IntoResponse> {
    let store = state.db.store().await?;
    let repo = EventRepository::new(store.as_ref());

    let existing = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| event_not_found(&slug))?;
    let event = repo.update(&existing.id, payload).await?;

    Ok(Json(json!({ "event": EventBody::from(&event) })))
}

pub async fn update_event_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEvent>,
) -> ApiResult<Json<Value>> {
    let id = parse_event_id(&id)?;

    let store = state.db.store().await?;
    let event = EventRepository::new(store.as_ref())
        .update(&id, payload)
        .await?;

    Ok(Json(json!({ "event": EventBody::from(&event) })))
}

pub async fn similar_events(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let store = state.db.store().await?;
    let similar = EventRepository::new(store.as_ref())
        .similar_by_slug(&slug)
        .await?;

    let events: Vec<EventBody> = similar.iter().map(EventBody::from).collect();
    Ok(Json(json!({ "events": events })))
}

pub async fn event_bookings(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let store = state.db.store().await?;
    let event = EventRepository::new(store.as_ref())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| event_not_found(&slug))?;

    let bookings_repo = BookingRepository::new(store.as_ref());
    let bookings = bookings_repo.list_for_event(&event.id).await?;
    let count = bookings_repo.count_for_event(&event.id).await?;

    let bookings: Vec<BookingBody> = bookings.iter().map(BookingBody::from).collect();
    Ok(Json(json!({ "bookings": bookings, "count": count })))
}
