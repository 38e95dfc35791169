use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::error::Result;
use crate::models::{Booking, Event};

pub const EVENTS_COLLECTION: &str = "events";
pub const BOOKINGS_COLLECTION: &str = "bookings";

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts a new event. A taken slug is a `ConstraintViolation`.
    async fn insert_event(&self, event: &Event) -> Result<()>;

    /// Replaces a stored event by id. A missing record is `NotFound`.
    async fn replace_event(&self, event: &Event) -> Result<()>;

    async fn find_event(&self, id: &ObjectId) -> Result<Option<Event>>;

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    /// All events, newest first.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Events carrying any of `tags`, newest first, without `exclude`.
    async fn find_events_with_tags(&self, tags: &[String], exclude: &ObjectId) -> Result<Vec<Event>>;

    async fn event_exists(&self, id: &ObjectId) -> Result<bool>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a booking. A second booking for the same event and email is a
    /// `ConstraintViolation`.
    async fn insert_booking(&self, booking: &Booking) -> Result<()>;

    async fn replace_booking(&self, booking: &Booking) -> Result<()>;

    async fn find_booking(&self, id: &ObjectId) -> Result<Option<Booking>>;

    /// Bookings of one event, newest first.
    async fn list_bookings_for_event(&self, event_id: &ObjectId) -> Result<Vec<Booking>>;

    async fn count_bookings_for_event(&self, event_id: &ObjectId) -> Result<u64>;
}

#[async_trait]
pub trait Store: EventStore + BookingStore {
    async fn ping(&self) -> Result<()>;
}

/// Hands out a live store, connecting on first use.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    async fn store(&self) -> Result<Arc<dyn Store>>;
}
