use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::Error;
use crate::models::{Booking, Event};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::ConstraintViolation(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Configuration(_) | Error::Database(_) => {
                error!("Request failed: {}", err);
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                };
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// JSON shape of an event: hex id and RFC 3339 timestamps.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Event> for EventBody {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_hex(),
            title: event.title.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            overview: event.overview.clone(),
            image: event.image.clone(),
            venue: event.venue.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            mode: event.mode.clone(),
            audience: event.audience.clone(),
            agenda: event.agenda.clone(),
            organizer: event.organizer.clone(),
            tags: event.tags.clone(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub id: String,
    pub event_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Booking> for BookingBody {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_hex(),
            event_id: booking.event_id.to_hex(),
            email: booking.email.clone(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
