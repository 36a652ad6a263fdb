//! KvStore trait + KvOps CRUD operations.
//!
//! The model impls `KvStore` to declare its prefix + hooks.
//! `KvOps<T>` provides the actual get/save/list/delete using a KVStore backend.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use wip_core::ServiceError;
use wip_kv::{KVError, KVStore};

/// Trait implemented by models to declare KV storage behavior.
pub trait KvStore: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable resource name used in error messages ("order").
    const RESOURCE: &'static str;

    /// KV key prefix: "wip:{resource}:".
    fn kv_prefix() -> &'static str;

    /// Extract the key value from this instance as a string.
    fn key_value(&self) -> String;

    /// Called before inserting a new record. Use for auto-fill (id, timestamps).
    fn before_create(&mut self) {}

    /// Called before updating an existing record.
    fn before_update(&mut self) {}
}

/// CRUD operations for a KvStore model. Holds a reference to the KV backend.
pub struct KvOps<T: KvStore> {
    kv: Arc<dyn KVStore>,
    _phantom: PhantomData<T>,
}

impl<T: KvStore> Clone for KvOps<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.kv))
    }
}

impl<T: KvStore> KvOps<T> {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            _phantom: PhantomData,
        }
    }

    fn make_key(id: &str) -> String {
        format!("{}{}", T::kv_prefix(), id)
    }

    fn kv_err(e: KVError) -> ServiceError {
        ServiceError::Storage(e.to_string())
    }

    fn encode(record: &T) -> Result<Vec<u8>, ServiceError> {
        serde_json::to_vec(record).map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))
    }

    fn decode(bytes: &[u8]) -> Result<T, ServiceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::Internal(format!("deserialize {}: {}", T::RESOURCE, e)))
    }

    /// Get a record by key value. Returns None if not found.
    pub fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        let key = Self::make_key(id);
        match self.kv.get(&key).map_err(Self::kv_err)? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a record or return NotFound error.
    pub fn get_or_err(&self, id: &str) -> Result<T, ServiceError> {
        self.get(id)?
            .ok_or_else(|| ServiceError::not_found(T::RESOURCE, id))
    }

    /// List all records with this prefix, in key order.
    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        let entries = self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?;
        entries.iter().map(|(_key, bytes)| Self::decode(bytes)).collect()
    }

    /// Count all records with this prefix.
    pub fn count(&self) -> Result<usize, ServiceError> {
        let entries = self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?;
        Ok(entries.len())
    }

    /// Create a new record. Calls before_create hook, checks for duplicates.
    pub fn save_new(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_create();

        let id = record.key_value();
        let key = Self::make_key(&id);

        if self.kv.get(&key).map_err(Self::kv_err)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "{} '{}' already exists",
                T::RESOURCE,
                id
            )));
        }

        self.kv.set(&key, &Self::encode(&record)?).map_err(Self::kv_err)?;
        Ok(record)
    }

    /// Create many records in one write. Calls before_create on each.
    ///
    /// Keys are not checked for duplicates; callers hand in fresh records.
    pub fn save_new_batch(&self, records: Vec<T>) -> Result<Vec<T>, ServiceError> {
        let mut prepared = Vec::with_capacity(records.len());
        for mut record in records {
            record.before_create();
            let key = Self::make_key(&record.key_value());
            let bytes = Self::encode(&record)?;
            prepared.push((key, bytes, record));
        }

        let entries: Vec<(&str, &[u8])> = prepared
            .iter()
            .map(|(key, bytes, _)| (key.as_str(), bytes.as_slice()))
            .collect();
        self.kv.batch_set(&entries).map_err(Self::kv_err)?;

        Ok(prepared.into_iter().map(|(_, _, record)| record).collect())
    }

    /// Create `records` and delete `source_ids` from collection `S` in one
    /// write. Calls before_create on each record.
    pub fn save_new_batch_moving<S: KvStore>(
        &self,
        records: Vec<T>,
        source_ids: &[String],
    ) -> Result<Vec<T>, ServiceError> {
        let mut prepared = Vec::with_capacity(records.len());
        for mut record in records {
            record.before_create();
            let key = Self::make_key(&record.key_value());
            let bytes = Self::encode(&record)?;
            prepared.push((key, bytes, record));
        }
        let retired: Vec<String> = source_ids
            .iter()
            .map(|id| format!("{}{}", S::kv_prefix(), id))
            .collect();

        let entries: Vec<(&str, &[u8])> = prepared
            .iter()
            .map(|(key, bytes, _)| (key.as_str(), bytes.as_slice()))
            .collect();
        let keys: Vec<&str> = retired.iter().map(String::as_str).collect();
        self.kv.batch_move(&entries, &keys).map_err(Self::kv_err)?;

        Ok(prepared.into_iter().map(|(_, _, record)| record).collect())
    }

    /// Update an existing record. Calls before_update hook.
    pub fn save(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_update();

        let key = Self::make_key(&record.key_value());
        self.kv.set(&key, &Self::encode(&record)?).map_err(Self::kv_err)?;

        Ok(record)
    }

    /// Delete a record by key value. Returns the deleted record.
    pub fn delete(&self, id: &str) -> Result<T, ServiceError> {
        let record = self.get_or_err(id)?;
        self.kv.delete(&Self::make_key(id)).map_err(Self::kv_err)?;
        Ok(record)
    }

    /// Delete many records by key value in one write. Missing keys are ignored.
    pub fn delete_batch(&self, ids: &[String]) -> Result<(), ServiceError> {
        let keys: Vec<String> = ids.iter().map(|id| Self::make_key(id)).collect();
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.kv.batch_delete(&keys).map_err(Self::kv_err)
    }

    /// Delete every record with this prefix. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, ServiceError> {
        let entries = self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?;
        let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
        self.kv.batch_delete(&keys).map_err(Self::kv_err)?;
        Ok(keys.len())
    }
}
