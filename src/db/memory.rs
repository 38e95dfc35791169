use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::store::{BookingStore, EventStore, Store, StoreProvider};
use crate::error::{Error, Result};
use crate::models::{Booking, Event};

#[derive(Default)]
struct Collections {
    events: HashMap<ObjectId, Event>,
    bookings: HashMap<ObjectId, Booking>,
}

/// In-process store honouring the same unique keys as the MongoDB indexes:
/// `events.slug` and `(bookings.eventId, bookings.email)`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut records: Vec<T>, key: impl Fn(&T) -> (DateTime<Utc>, ObjectId)) -> Vec<T> {
    records.sort_by_key(|r| Reverse(key(r)));
    records
}

fn slug_taken(events: &HashMap<ObjectId, Event>, event: &Event) -> bool {
    events
        .values()
        .any(|other| other.id != event.id && other.slug == event.slug)
}

fn booking_taken(bookings: &HashMap<ObjectId, Booking>, booking: &Booking) -> bool {
    bookings.values().any(|other| {
        other.id != booking.id && other.event_id == booking.event_id && other.email == booking.email
    })
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.events.contains_key(&event.id) {
            return Err(Error::ConstraintViolation(format!("duplicate event id {}", event.id)));
        }
        if slug_taken(&inner.events, event) {
            return Err(Error::ConstraintViolation(format!("duplicate slug '{}'", event.slug)));
        }
        inner.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn replace_event(&self, event: &Event) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.events.contains_key(&event.id) {
            return Err(Error::NotFound(format!("Event {}", event.id)));
        }
        if slug_taken(&inner.events, event) {
            return Err(Error::ConstraintViolation(format!("duplicate slug '{}'", event.slug)));
        }
        inner.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn find_event(&self, id: &ObjectId) -> Result<Option<Event>> {
        Ok(self.inner.read().await.events.get(id).cloned())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let inner = self.inner.read().await;
        Ok(inner.events.values().find(|e| e.slug == slug).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let events: Vec<Event> = self.inner.read().await.events.values().cloned().collect();
        Ok(newest_first(events, |e| (e.created_at, e.id)))
    }

    async fn find_events_with_tags(&self, tags: &[String], exclude: &ObjectId) -> Result<Vec<Event>> {
        let events: Vec<Event> = self
            .inner
            .read()
            .await
            .events
            .values()
            .filter(|e| e.id != *exclude && e.tags.iter().any(|t| tags.contains(t)))
            .cloned()
            .collect();
        Ok(newest_first(events, |e| (e.created_at, e.id)))
    }

    async fn event_exists(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.inner.read().await.events.contains_key(id))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.bookings.contains_key(&booking.id) {
            return Err(Error::ConstraintViolation(format!("duplicate booking id {}", booking.id)));
        }
        if booking_taken(&inner.bookings, booking) {
            return Err(Error::ConstraintViolation(format!(
                "{} already booked event {}",
                booking.email, booking.event_id
            )));
        }
        inner.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn replace_booking(&self, booking: &Booking) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.bookings.contains_key(&booking.id) {
            return Err(Error::NotFound(format!("Booking {}", booking.id)));
        }
        if booking_taken(&inner.bookings, booking) {
            return Err(Error::ConstraintViolation(format!(
                "{} already booked event {}",
                booking.email, booking.event_id
            )));
        }
        inner.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_booking(&self, id: &ObjectId) -> Result<Option<Booking>> {
        Ok(self.inner.read().await.bookings.get(id).cloned())
    }

    async fn list_bookings_for_event(&self, event_id: &ObjectId) -> Result<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .inner
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.event_id == *event_id)
            .cloned()
            .collect();
        Ok(newest_first(bookings, |b| (b.created_at, b.id)))
    }

    async fn count_bookings_for_event(&self, event_id: &ObjectId) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.bookings.values().filter(|b| b.event_id == *event_id).count() as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl StoreProvider for MemoryStore {
    async fn store(&self) -> Result<Arc<dyn Store>> {
        Ok(Arc::new(self.clone()))
    }
}
