pub mod connection;
pub mod memory;
pub mod mongo;
pub mod store;

pub use connection::{ConnectionManager, Connector};
pub use memory::MemoryStore;
pub use mongo::{MongoConnector, MongoStore};
pub use store::{BookingStore, EventStore, Store, StoreProvider};
