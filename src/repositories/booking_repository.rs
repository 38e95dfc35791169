use bson::oid::ObjectId;
use tracing::info;

use crate::db::Store;
use crate::error::{Error, Result};
use crate::models::{Booking, CreateBooking, UpdateBooking};
use crate::validation::booking::{check_event_reference, normalize_email, parse_event_id};

pub struct BookingRepository<'a> {
    store: &'a dyn Store,
}

impl<'a> BookingRepository<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, create: CreateBooking) -> Result<Booking> {
        let email = normalize_email(&create.email)?;
        let event_id = parse_event_id(&create.event_id)?;
        check_event_reference(self.store, &event_id).await?;

        let booking = Booking::new(event_id, email);
        self.store.insert_booking(&booking).await?;
        info!("Created booking {} for event {}", booking.id, booking.event_id);

        Ok(booking)
    }

    /// The event reference is only re-checked when the update points the booking elsewhere.
    pub async fn update(&self, id: &ObjectId, update: UpdateBooking) -> Result<Booking> {
        let existing = self
            .store
            .find_booking(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Booking {}", id)))?;

        let mut booking = existing.clone();

        if let Some(email) = update.email {
            booking.email = normalize_email(&email)?;
        }

        if let Some(raw) = update.event_id {
            let event_id = parse_event_id(&raw)?;
            if event_id != existing.event_id {
                check_event_reference(self.store, &event_id).await?;
            }
            booking.event_id = event_id;
        }

        booking.touch();
        self.store.replace_booking(&booking).await?;
        info!("Updated booking {}", booking.id);

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Booking>> {
        self.store.find_booking(id).await
    }

    pub async fn list_for_event(&self, event_id: &ObjectId) -> Result<Vec<Booking>> {
        self.store.list_bookings_for_event(event_id).await
    }

    pub async fn count_for_event(&self, event_id: &ObjectId) -> Result<u64> {
        self.store.count_bookings_for_event(event_id).await
    }
}
