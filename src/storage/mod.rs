//! Durable key-value slots backing local persistence.
//!
//! Every value is a complete JSON document; writers overwrite the whole
//! slot. Backends:
//! - `json`: one file per key in the data directory
//! - `sqlite`: a single `kv` table
//! - `memory`: process-local, for tests and throwaway sessions

pub mod conversations;
pub mod file;
pub mod lock;
pub mod memory;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use crate::config::StorageBackend;
use crate::error::Result;

pub use conversations::{ConversationStore, CONVERSATIONS_KEY};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A named-slot store.
pub trait KeyValueStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Read a slot. A missing slot is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Open the configured backend rooted at `data_dir`.
pub fn open_store(backend: StorageBackend, data_dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match backend {
        StorageBackend::Json => Arc::new(JsonFileStore::new(data_dir.join("store"))?),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(data_dir.join("hackmatch.db"))?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!("Opened {} store under {}", store.name(), data_dir.display());
    Ok(store)
}
