//! # Storage Module
//!
//! Local persistence for the wallet: one table of encrypted identities and
//! one of credentials. Everything above this layer talks to the
//! [`WalletStore`] trait, so the engine underneath is swappable.
//!
//! ## Layout
//!
//! ```text
//! mod.rs      - Table, WalletStore trait, StoreError, open_store()
//! memory.rs   - in-process BTreeMaps behind a RwLock (tests, ephemeral wallets)
//! db.rs       - sled-backed store (the real thing)
//! records.rs  - typed record shapes and their byte encodings
//! ```
//!
//! ## Design Decisions
//!
//! 1. **Stores move bytes, not types.** Record (de)serialization lives in
//!    [`records`], so every engine behaves identically for the same input.
//!
//! 2. **One key, one write.** Each `put` is a single atomic insert followed
//!    by a flush. A failed write leaves the previous value in place.
//!
//! 3. **Bincode for identities, JSON for credentials.** Identity records have
//!    a fixed shape; credentials carry arbitrary JSON that bincode can't
//!    round-trip.

pub mod db;
pub mod memory;
pub mod records;

use std::fmt::Debug;

use crate::config::{StorageBackend, CREDENTIALS_TREE, IDENTITY_TREE};
use crate::error::ErrorKind;

pub use db::SledStore;
pub use memory::MemoryStore;
pub use records::IdentityRecord;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The engine couldn't be opened, read, or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record couldn't be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl StoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Unavailable(_) | StoreError::Serialization(_) => {
                ErrorKind::StorageUnavailable
            }
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// The wallet's two record tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// Encrypted identity records, keyed by DID.
    Identity,
    /// Verifiable credentials as JSON, keyed by credential id.
    Credentials,
}

impl Table {
    /// Every table, in a fixed order.
    pub const ALL: [Table; 2] = [Table::Identity, Table::Credentials];

    /// Stable on-disk name of the table.
    pub fn name(self) -> &'static str {
        match self {
            Table::Identity => IDENTITY_TREE,
            Table::Credentials => CREDENTIALS_TREE,
        }
    }
}

// ---------------------------------------------------------------------------
// WalletStore
// ---------------------------------------------------------------------------

/// A key-value store with one keyspace per [`Table`].
///
/// Implementations must be safe to share across threads; the facade holds
/// one behind a `Box<dyn WalletStore>`.
pub trait WalletStore: Send + Sync + Debug {
    /// Insert or replace `key`. Durable once this returns `Ok`.
    fn put(&self, table: Table, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Fetch `key`, or `None` if it was never written.
    fn get(&self, table: Table, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Every entry in `table`, ordered by key.
    fn get_all(&self, table: Table) -> StoreResult<Vec<(String, Vec<u8>)>>;

    /// Delete `key`. Returns whether it existed.
    fn remove(&self, table: Table, key: &str) -> StoreResult<bool>;

    /// Delete every entry in `table`.
    fn clear(&self, table: Table) -> StoreResult<()>;

    /// Block until pending writes are durable.
    fn flush(&self) -> StoreResult<()>;

    /// Number of entries in `table`.
    fn count(&self, table: Table) -> StoreResult<usize> {
        Ok(self.get_all(table)?.len())
    }
}

/// Open the store described by `backend`.
pub fn open_store(backend: &StorageBackend) -> StoreResult<Box<dyn WalletStore>> {
    let store: Box<dyn WalletStore> = match backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Temporary => Box::new(SledStore::open_temporary()?),
        StorageBackend::Sled { path } => Box::new(SledStore::open(path)?),
    };
    tracing::debug!(?backend, "wallet store opened");
    Ok(store)
}
