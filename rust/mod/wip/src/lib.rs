//! Shop-floor work-in-progress tracker.
//!
//! Active repair orders, shift handoff notes, their archives and the audit
//! trail, stored as JSON documents in a [`wip_kv::KVStore`].

pub mod api;
pub mod bucket;
pub mod import;
pub mod model;
pub mod pdf;
pub mod service;
pub mod shift;
mod store_impls;

use std::sync::Arc;

use axum::Router;
use wip_core::Module;

pub use service::WipService;

/// The WIP module: orders, shift notes, their archives and the audit trail.
pub struct WipModule {
    service: Arc<WipService>,
}

impl WipModule {
    pub fn new(service: Arc<WipService>) -> Self {
        Self { service }
    }
}

impl Module for WipModule {
    fn name(&self) -> &str {
        "wip"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
