use bson::oid::ObjectId;
use chrono::Utc;
use tracing::{debug, info};

use crate::db::Store;
use crate::error::{Error, Result};
use crate::models::{CreateEvent, Event, UpdateEvent};
use crate::validation::event::normalize_event;

pub struct EventRepository<'a> {
    store: &'a dyn Store,
}

impl<'a> EventRepository<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, create: CreateEvent) -> Result<Event> {
        let event = normalize_event(Event::new(create), None)?;

        self.store.insert_event(&event).await?;
        info!("Created event {} ({})", event.id, event.slug);

        Ok(event)
    }

    /// Applies a partial update and re-runs the save pipeline against the stored version.
    pub async fn update(&self, id: &ObjectId, update: UpdateEvent) -> Result<Event> {
        let existing = self
            .store
            .find_event(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Event {}", id)))?;

        let mut draft = existing.clone();
        draft.apply_update(update);

        let mut event = normalize_event(draft, Some(&existing))?;
        event.updated_at = Utc::now();

        self.store.replace_event(&event).await?;
        info!("Updated event {} ({})", event.id, event.slug);

        Ok(event)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Event>> {
        self.store.find_event(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        self.store.find_event_by_slug(slug.trim()).await
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.store.list_events().await
    }

    /// Other events sharing at least one tag with the event at `slug`.
    pub async fn similar_by_slug(&self, slug: &str) -> Result<Vec<Event>> {
        let event = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Event '{}'", slug)))?;

        let similar = self
            .store
            .find_events_with_tags(&event.tags, &event.id)
            .await?;
        debug!("Found {} event(s) similar to '{}'", similar.len(), slug);

        Ok(similar)
    }
}
