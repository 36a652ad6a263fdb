pub mod archives;
pub mod history;
pub mod import;
pub mod orders;
pub mod search;
pub mod shift_notes;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::warn;

use wip_core::{Clock, ServiceError};
use wip_kv::KVStore;
use wip_store::KvOps;

use crate::bucket::ArchivePolicy;
use crate::model::*;

pub use history::HistoryFilter;
pub use import::ImportOutcome;
pub use orders::DedupeOutcome;
pub use search::{SearchHit, SearchSource};
pub use shift_notes::{NoteArchiveOutcome, NoteUpdate};

/// WIP service: one typed collection per document kind, plus the shop's
/// wall clock and archive policy.
pub struct WipService {
    pub(crate) orders: KvOps<Order>,
    pub(crate) archived_orders: KvOps<ArchivedOrder>,
    pub(crate) notes: KvOps<ShiftNote>,
    pub(crate) archived_notes: KvOps<ArchivedShiftNote>,
    pub(crate) history: KvOps<HistoryEntry>,
    clock: Arc<dyn Clock>,
    policy: ArchivePolicy,
}

impl WipService {
    pub fn new(kv: Arc<dyn KVStore>, clock: Arc<dyn Clock>, policy: ArchivePolicy) -> Self {
        Self {
            orders: KvOps::new(Arc::clone(&kv)),
            archived_orders: KvOps::new(Arc::clone(&kv)),
            notes: KvOps::new(Arc::clone(&kv)),
            archived_notes: KvOps::new(Arc::clone(&kv)),
            history: KvOps::new(kv),
            clock,
            policy,
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// The shop's local calendar day.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub fn policy(&self) -> ArchivePolicy {
        self.policy
    }

    /// Append an audit entry. A failed write is logged and otherwise ignored.
    pub(crate) fn audit(&self, entry: HistoryEntry) {
        let (action, entity_id) = (entry.action_type, entry.entity_id.clone());
        if let Err(e) = self.history.save_new(entry) {
            warn!(?action, entity_id = %entity_id, "failed to record history: {}", e);
        }
    }
}

/// Reject blank text for a required field.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::required(field));
    }
    Ok(())
}

/// Case-insensitive substring match over any of `fields`.
pub(crate) fn matches_any(needle_lower: &str, fields: &[&str]) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(needle_lower))
}
