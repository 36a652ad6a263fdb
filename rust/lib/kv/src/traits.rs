use crate::error::KVError;

/// KVStore is the document store behind every tracker collection.
///
/// Keys are namespaced by collection: `wip:order:{id}`,
/// `wip:shift_note:{id}`, etc. Values are JSON documents.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Set many pairs in one write transaction.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError>;

    /// Delete many keys in one write transaction.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError>;

    /// Set `entries` and delete `keys` in one write transaction: either
    /// every change lands or none does.
    fn batch_move(&self, entries: &[(&str, &[u8])], keys: &[&str]) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
