//! In-memory [`WalletStore`].

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{StoreResult, Table, WalletStore};

type Map = BTreeMap<String, Vec<u8>>;

/// A store that lives only as long as the process. Used by tests and by
/// wallets that never touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    identity: RwLock<Map>,
    credentials: RwLock<Map>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, table: Table) -> &RwLock<Map> {
        match table {
            Table::Identity => &self.identity,
            Table::Credentials => &self.credentials,
        }
    }
}

impl WalletStore for MemoryStore {
    fn put(&self, table: Table, key: &str, value: &[u8]) -> StoreResult<()> {
        self.map(table).write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, table: Table, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.map(table).read().get(key).cloned())
    }

    fn get_all(&self, table: Table) -> StoreResult<Vec<(String, Vec<u8>)>> {
        Ok(self
            .map(table)
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn remove(&self, table: Table, key: &str) -> StoreResult<bool> {
        Ok(self.map(table).write().remove(key).is_some())
    }

    fn clear(&self, table: Table) -> StoreResult<()> {
        self.map(table).write().clear();
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    fn count(&self, table: Table) -> StoreResult<usize> {
        Ok(self.map(table).read().len())
    }
}
