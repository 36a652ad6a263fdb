//! Typed document collections.
//!
//! A model implements [`KvStore`] to declare its key prefix and hooks.
//! [`KvOps`] provides the CRUD and bulk operations over a `KVStore` backend.
//!
//! ```ignore
//! impl KvStore for Order {
//!     const RESOURCE: &'static str = "order";
//!     fn kv_prefix() -> &'static str { "wip:order:" }
//!     fn key_value(&self) -> String { self.id.clone() }
//! }
//! ```

pub mod kv;

pub use kv::{KvOps, KvStore};
