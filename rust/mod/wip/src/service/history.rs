use serde::Deserialize;
use tracing::info;

use wip_core::ServiceError;

use crate::model::{ActionType, EntityType, HistoryEntry};
use super::{require, WipService};

fn default_history_limit() -> usize {
    100
}

/// Filters for the audit trail. Unset fields match everything.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    #[serde(default)]
    pub action_type: Option<ActionType>,
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            user_name: None,
            entity_type: None,
            action_type: None,
            limit: default_history_limit(),
        }
    }
}

impl HistoryFilter {
    fn matches(&self, entry: &HistoryEntry) -> bool {
        self.user_name.as_deref().map_or(true, |u| entry.user_name == u)
            && self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self.action_type.map_or(true, |a| entry.action_type == a)
    }
}

fn newest_first(entries: &mut [HistoryEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

impl WipService {
    pub fn list_history(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, ServiceError> {
        let mut entries: Vec<HistoryEntry> = self
            .history
            .list()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        newest_first(&mut entries);
        entries.truncate(filter.limit);
        Ok(entries)
    }

    pub fn history_for_entity(&self, entity_id: &str) -> Result<Vec<HistoryEntry>, ServiceError> {
        let mut entries: Vec<HistoryEntry> = self
            .history
            .list()?
            .into_iter()
            .filter(|e| e.entity_id == entity_id)
            .collect();
        newest_first(&mut entries);
        Ok(entries)
    }

    /// Store a client-supplied audit entry. Id and timestamp are assigned here.
    pub fn record_history(&self, mut entry: HistoryEntry) -> Result<HistoryEntry, ServiceError> {
        require("entityId", &entry.entity_id)?;
        require("userName", &entry.user_name)?;
        entry.id.clear();
        entry.timestamp.clear();
        self.history.save_new(entry)
    }

    /// Drop the whole audit trail. Returns how many entries were removed.
    pub fn clear_history(&self) -> Result<usize, ServiceError> {
        let removed = self.history.clear()?;
        info!(removed, "cleared history");
        Ok(removed)
    }
}
