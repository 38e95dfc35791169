use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::store::{Store, StoreProvider};
use crate::error::Result;

/// Opens one underlying database connection.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle>;

    async fn close(&self, _handle: Self::Handle) {}
}

type PendingConnect<H> = Shared<BoxFuture<'static, Result<H>>>;

enum Slot<H> {
    Empty,
    Connecting { generation: u64, attempt: PendingConnect<H> },
    Ready { generation: u64, handle: H },
}

/// Memoizes a single connection for everything that shares this manager.
///
/// Concurrent callers arriving while an attempt is in flight await that same
/// attempt. A failed attempt is dropped from the slot so the next call retries.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    slot: Mutex<Slot<C::Handle>>,
    generations: AtomicU64,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            slot: Mutex::new(Slot::Empty),
            generations: AtomicU64::new(0),
        }
    }

    pub async fn connect(&self) -> Result<C::Handle> {
        let (generation, attempt) = {
            let mut slot = self.slot.lock().await;
            match &*slot {
                Slot::Ready { handle, .. } => return Ok(handle.clone()),
                Slot::Connecting { generation, attempt } => {
                    debug!("Joining in-flight connection attempt");
                    (*generation, attempt.clone())
                }
                Slot::Empty => {
                    let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
                    let connector = Arc::clone(&self.connector);
                    let attempt = async move { connector.connect().await }.boxed().shared();

                    info!("Connecting to database (attempt #{})", generation);
                    *slot = Slot::Connecting {
                        generation,
                        attempt: attempt.clone(),
                    };
                    (generation, attempt)
                }
            }
        };

        let result = attempt.await;

        let mut slot = self.slot.lock().await;
        // Only the attempt that still owns the slot may settle it; a disconnect
        // in the meantime has already moved on.
        if matches!(&*slot, Slot::Connecting { generation: current, .. } if *current == generation) {
            *slot = match &result {
                Ok(handle) => {
                    info!("Database connected");
                    Slot::Ready {
                        generation,
                        handle: handle.clone(),
                    }
                }
                Err(err) => {
                    warn!("Database connection failed: {}", err);
                    Slot::Empty
                }
            };
        }

        result
    }

    pub async fn is_connected(&self) -> bool {
        matches!(&*self.slot.lock().await, Slot::Ready { .. })
    }

    /// Drops the cached handle, closing it. The next `connect` starts over.
    ///
    /// An attempt still in flight is awaited and its handle closed as well, so
    /// callers that joined it receive a handle that is already shut down.
    pub async fn disconnect(&self) {
        let previous = std::mem::replace(&mut *self.slot.lock().await, Slot::Empty);
        match previous {
            Slot::Ready { generation, handle } => {
                info!("Closing database connection #{}", generation);
                self.connector.close(handle).await;
            }
            Slot::Connecting {
                generation,
                attempt,
            } => {
                debug!("Waiting on in-flight connection attempt #{} to close it", generation);
                if let Ok(handle) = attempt.await {
                    info!("Closing database connection #{}", generation);
                    self.connector.close(handle).await;
                }
            }
            Slot::Empty => {}
        }
    }
}

#[async_trait]
impl<C> StoreProvider for ConnectionManager<C>
where
    C: Connector,
    C::Handle: Store,
{
    async fn store(&self) -> Result<Arc<dyn Store>> {
        let handle = self.connect().await?;
        Ok(Arc::new(handle))
    }
}
