use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bson::oid::ObjectId;
use serde_json::{json, Value};

use crate::api::response::{ApiError, ApiResult, BookingBody};
use crate::api::AppState;
use crate::models::{CreateBooking, UpdateBooking};
use crate::repositories::BookingRepository;

pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBooking>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let store = state.db.store().await?;
    let booking = BookingRepository::new(store.as_ref()).create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "booking": BookingBody::from(&booking) })),
    ))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBooking>,
) -> ApiResult<Json<Value>> {
    let id = ObjectId::parse_str(&id).map_err(|_| ApiError {
        status: StatusCode::BAD_REQUEST,
        message: "Invalid booking id".to_string(),
    })?;

    let store = state.db.store().await?;
    let booking = BookingRepository::new(store.as_ref())
        .update(&id, payload)
        .await?;

    Ok(Json(json!({ "booking": BookingBody::from(&booking) })))
}
