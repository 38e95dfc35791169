use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use super::connection::Connector;
use super::store::{BookingStore, EventStore, Store, BOOKINGS_COLLECTION, EVENTS_COLLECTION};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Booking, Event};

/// Opens a MongoDB client, verifies it with a ping and ensures the indexes.
pub struct MongoConnector {
    uri: String,
    database: String,
    server_selection_timeout: Duration,
    socket_timeout: Duration,
}

impl MongoConnector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            uri: config.mongodb_uri.clone(),
            database: config.database.clone(),
            server_selection_timeout: config.server_selection_timeout,
            socket_timeout: config.socket_timeout,
        }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = MongoStore;

    async fn connect(&self) -> Result<MongoStore> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        options.server_selection_timeout = Some(self.server_selection_timeout);
        options.max_idle_time = Some(self.socket_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options).map_err(|e| Error::Connection(e.to_string()))?;
        let store = MongoStore::new(client, &self.database);

        store
            .ping()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        store.ensure_indexes().await?;

        Ok(store)
    }

    async fn close(&self, handle: MongoStore) {
        handle.client.shutdown().await;
    }
}

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, database: &str) -> Self {
        let db = client.database(database);
        Self { client, db }
    }

    fn events(&self) -> Collection<Event> {
        self.db.collection(EVENTS_COLLECTION)
    }

    fn bookings(&self) -> Collection<Booking> {
        self.db.collection(BOOKINGS_COLLECTION)
    }

    /// Creates the indexes the uniqueness and lookup guarantees rely on.
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.events()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "slug": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        self.bookings()
            .create_indexes(vec![
                IndexModel::builder().keys(doc! { "eventId": 1 }).build(),
                IndexModel::builder()
                    .keys(doc! { "eventId": 1, "createdAt": -1 })
                    .build(),
                IndexModel::builder().keys(doc! { "email": 1 }).build(),
                IndexModel::builder()
                    .keys(doc! { "eventId": 1, "email": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("uniq_event_email".to_string())
                            .build(),
                    )
                    .build(),
            ])
            .await?;

        info!("Database indexes ensured");
        Ok(())
    }

    async fn find_events(&self, filter: Document) -> Result<Vec<Event>> {
        let cursor = self
            .events()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl EventStore for MongoStore {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.events().insert_one(event).await?;
        debug!("Inserted event {}", event.id);
        Ok(())
    }

    async fn replace_event(&self, event: &Event) -> Result<()> {
        let result = self
            .events()
            .replace_one(doc! { "_id": event.id }, event)
            .await?;

        if result.matched_count == 0 {
            return Err(Error::NotFound(format!("Event {}", event.id)));
        }
        Ok(())
    }

    async fn find_event(&self, id: &ObjectId) -> Result<Option<Event>> {
        Ok(self.events().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        Ok(self.events().find_one(doc! { "slug": slug }).await?)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        self.find_events(doc! {}).await
    }

    async fn find_events_with_tags(&self, tags: &[String], exclude: &ObjectId) -> Result<Vec<Event>> {
        self.find_events(doc! {
            "_id": { "$ne": *exclude },
            "tags": { "$in": tags.to_vec() },
        })
        .await
    }

    async fn event_exists(&self, id: &ObjectId) -> Result<bool> {
        let count = self
            .events()
            .count_documents(doc! { "_id": *id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl BookingStore for MongoStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        self.bookings().insert_one(booking).await?;
        debug!("Inserted booking {} for event {}", booking.id, booking.event_id);
        Ok(())
    }

    async fn replace_booking(&self, booking: &Booking) -> Result<()> {
        let result = self
            .bookings()
            .replace_one(doc! { "_id": booking.id }, booking)
            .await?;

        if result.matched_count == 0 {
            return Err(Error::NotFound(format!("Booking {}", booking.id)));
        }
        Ok(())
    }

    async fn find_booking(&self, id: &ObjectId) -> Result<Option<Booking>> {
        Ok(self.bookings().find_one(doc! { "_id": *id }).await?)
    }

    async fn list_bookings_for_event(&self, event_id: &ObjectId) -> Result<Vec<Booking>> {
        let cursor = self
            .bookings()
            .find(doc! { "eventId": *event_id })
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn count_bookings_for_event(&self, event_id: &ObjectId) -> Result<u64> {
        Ok(self
            .bookings()
            .count_documents(doc! { "eventId": *event_id })
            .await?)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
