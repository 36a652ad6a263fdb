//! Byte-level document storage for the tracker.
//!
//! [`KVStore`] is the seam; [`RedbStore`] is the single-file backend.

pub mod error;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use redb::RedbStore;
pub use traits::KVStore;
