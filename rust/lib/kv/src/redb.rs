use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, Table, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("wip");

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database. One file holds every collection.
pub struct RedbStore {
    db: Arc<Database>,
}

fn storage_err(e: impl Into<redb::Error>) -> KVError {
    KVError::Storage(e.into().to_string())
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage_err)?;

        // Ensure the table exists so read transactions never miss it.
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        debug!("opened document store at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    /// Run `f` against the table inside one write transaction and commit.
    fn write<F>(&self, f: F) -> Result<(), KVError>
    where
        F: FnOnce(&mut Table<'_, &'static str, &'static [u8]>) -> Result<(), KVError>,
    {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
            f(&mut table)?;
        }
        write_txn.commit().map_err(storage_err)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(TABLE).map_err(storage_err)?;

        let value = table.get(key).map_err(storage_err)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.write(|table| {
            table.insert(key, value).map_err(storage_err)?;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.write(|table| {
            table.remove(key).map_err(storage_err)?;
            Ok(())
        })
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        self.write(|table| {
            for (key, value) in entries {
                table.insert(*key, *value).map_err(storage_err)?;
            }
            Ok(())
        })
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for key in keys {
                table.remove(*key).map_err(storage_err)?;
            }
            Ok(())
        })
    }

    fn batch_move(&self, entries: &[(&str, &[u8])], keys: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for (key, value) in entries {
                table.insert(*key, *value).map_err(storage_err)?;
            }
            for key in keys {
                table.remove(*key).map_err(storage_err)?;
            }
            Ok(())
        })
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(TABLE).map_err(storage_err)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(storage_err)? {
            let (key, value) = entry.map_err(storage_err)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_string(), value.value().to_vec()));
        }

        Ok(results)
    }
}
