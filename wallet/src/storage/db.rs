//! # SledStore: Persistent Wallet Storage
//!
//! The on-disk backend, built on sled's embedded key-value store. Each
//! [`Table`] maps to one named sled tree:
//!
//! | Tree          | Key                   | Value                        |
//! |---------------|-----------------------|------------------------------|
//! | `identity`    | DID (UTF-8)           | `bincode(IdentityRecord)`    |
//! | `credentials` | credential id (UTF-8) | JSON                         |
//!
//! sled orders keys lexicographically, so `get_all` comes back sorted by key
//! without any extra work.
//!
//! ## Durability
//!
//! Every write is a single-key insert followed by `flush()`. sled's inserts
//! are atomic per key, so a crash mid-write leaves either the old value or
//! the new one, never a mix.

use std::path::Path;

use sled::{Db, Tree};

use super::{StoreError, StoreResult, Table, WalletStore};

/// sled-backed [`WalletStore`].
///
/// # Thread Safety
///
/// sled trees support lock-free concurrent reads and serialized writes, so
/// `SledStore` is `Send + Sync` with no extra locking.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: Db,
    identity: Tree,
    credentials: Tree,
}

impl SledStore {
    /// Open or create a database at the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            tracing::warn!(path = %path.as_ref().display(), error = %e, "failed to open wallet database");
            StoreError::from(e)
        })?;
        Self::from_db(db)
    }

    /// A database that is deleted when the last handle drops.
    pub fn open_temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        let identity = db.open_tree(Table::Identity.name())?;
        let credentials = db.open_tree(Table::Credentials.name())?;
        Ok(Self {
            db,
            identity,
            credentials,
        })
    }

    fn tree(&self, table: Table) -> &Tree {
        match table {
            Table::Identity => &self.identity,
            Table::Credentials => &self.credentials,
        }
    }
}

impl WalletStore for SledStore {
    fn put(&self, table: Table, key: &str, value: &[u8]) -> StoreResult<()> {
        self.tree(table).insert(key.as_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }

    fn get(&self, table: Table, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.tree(table).get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn get_all(&self, table: Table) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for result in self.tree(table).iter() {
            let (key, value) = result?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|_| StoreError::Serialization("non UTF-8 key in store".to_string()))?;
            entries.push((key, value.to_vec()));
        }
        Ok(entries)
    }

    fn remove(&self, table: Table, key: &str) -> StoreResult<bool> {
        let existed = self.tree(table).remove(key.as_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    fn clear(&self, table: Table) -> StoreResult<()> {
        self.tree(table).clear()?;
        self.db.flush()?;
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }

    fn count(&self, table: Table) -> StoreResult<usize> {
        Ok(self.tree(table).len())
    }
}
