//! Client registry
//!
//! Manages registered clients and their tracking.

use log::{error, info};
use std::path::Path;

use crate::client::{ClientRecord, ExclusiveQueue, IdClock};
use crate::error::RegistryError;
use crate::storage::{FileStore, RegistryStore, remove_one};

/// Registry of clients with an upload stream in flight.
///
/// Mutations (`register_client_start`, `register_client_end`) go through the
/// registry's own gate and are flushed before they return. Listing reads the
/// store directly and may observe the state before or after a concurrent
/// mutation.
#[derive(Debug)]
pub struct ClientRegistry<S: RegistryStore = FileStore> {
    store: S,
    queue: ExclusiveQueue,
    clock: IdClock,
}

impl ClientRegistry<FileStore> {
    /// Registry kept in the file at `path`.
    pub fn with_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(FileStore::new(path))
    }
}

impl<S: RegistryStore> ClientRegistry<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            queue: ExclusiveQueue::new(),
            clock: IdClock::new(),
        }
    }

    /// Location of the registry storage.
    pub fn path(&self) -> &Path {
        self.store.location()
    }

    /// Mints an identifier for a new stream and durably records it.
    pub async fn register_client_start(&self) -> Result<ClientRecord, RegistryError> {
        let record = self.clock.next_record();

        self.queue
            .run_exclusive(|| self.store.append(&record))
            .await
            .map_err(RegistryError::Registration)?;

        info!("Registered client {}", record);
        Ok(record)
    }

    /// Removes every entry for `record`, best-effort.
    ///
    /// Returns the remaining clients, or `None` if the removal failed. The
    /// failure is logged and not passed on.
    pub async fn register_client_end(&self, record: &ClientRecord) -> Option<Vec<ClientRecord>> {
        match self.remove(record).await {
            Ok(remaining) => {
                info!(
                    "Deregistered client {} ({} still active)",
                    record,
                    remaining.len()
                );
                Some(remaining)
            }
            Err(e) => {
                error!("{} ({})", e, record);
                None
            }
        }
    }

    /// Point-in-time snapshot of the registered clients, in registration order.
    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, RegistryError> {
        self.store.read_all().await.map_err(RegistryError::Read)
    }

    async fn remove(&self, record: &ClientRecord) -> Result<Vec<ClientRecord>, RegistryError> {
        self.queue
            .run_exclusive(|| remove_one(&self.store, record))
            .await
            .map_err(RegistryError::Deregistration)
    }
}
