pub mod bookings;
pub mod events;
pub mod health;
pub mod response;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::db::StoreProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn StoreProvider>,
}

pub fn build_router(db: Arc<dyn StoreProvider>) -> Router {
    let state = AppState { db };

    Router::new()
        .route("/health", get(health::health_check))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{slug}",
            get(events::get_event).patch(events::update_event),
        )
        .route("/events/id/{id}", patch(events::update_event_by_id))
        .route("/events/{slug}/similar", get(events::similar_events))
        .route("/events/{slug}/bookings", get(events::event_bookings))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/{id}", patch(bookings::update_booking))
        .with_state(state)
}
