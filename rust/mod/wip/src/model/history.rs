use serde::{Deserialize, Serialize};

/// What happened to the entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Create,
    Update,
    Delete,
    Archive,
}

/// Which collection the entity lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Order,
    #[serde(rename = "shiftnote")]
    ShiftNote,
}

/// Append-only audit record. Never mutated once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,

    pub action_type: ActionType,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human label for the entity, e.g. "Acme - RO 1234".
    #[serde(default)]
    pub entity_name: String,

    #[serde(default)]
    pub user_name: String,

    /// Free-form details: the patch applied, the archive month, etc.
    #[serde(default)]
    pub changes: serde_json::Value,

    /// RFC 3339. Filled on write when empty.
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(
        action_type: ActionType,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: impl Into<String>,
        user_name: impl Into<String>,
        changes: serde_json::Value,
    ) -> Self {
        Self {
            id: String::new(),
            action_type,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: entity_name.into(),
            user_name: user_name.into(),
            changes,
            timestamp: String::new(),
        }
    }
}
