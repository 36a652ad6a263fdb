use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Query string of a board listing, e.g. `?q=acme&sort=-dateAdded&limit=50`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Page size. The board normally asks for everything at once.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Rows to skip before the page starts.
    #[serde(default)]
    pub offset: usize,

    /// Column key, `-` prefix for descending. Each collection decides which
    /// keys it accepts.
    #[serde(default)]
    pub sort: Option<String>,

    /// Text typed into the board's search box, matched case-insensitively.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    500
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            sort: None,
            q: None,
        }
    }
}

/// One page of a listing plus the size of the whole filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Cut one page out of rows that are already filtered and sorted.
pub fn paginate<T: Serialize>(rows: Vec<T>, params: &ListParams) -> ListResult<T> {
    let total = rows.len();
    let items = rows
        .into_iter()
        .skip(params.offset)
        .take(params.limit)
        .collect();
    ListResult { items, total }
}

/// Document id: a dashless UUIDv4.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Stored timestamp form: UTC, nanoseconds, `Z` suffix. Strings in this
/// form sort in time order.
pub fn stamp_rfc3339<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// [`stamp_rfc3339`] of the host's current time.
pub fn now_rfc3339() -> String {
    stamp_rfc3339(&Utc::now())
}

/// Apply an RFC 7386 merge-patch to a stored document.
///
/// `null` removes a key, objects merge key by key, anything else replaces.
pub fn merge_patch(doc: &mut serde_json::Value, patch: &serde_json::Value) {
    let (Some(fields), Some(changes)) = (doc.as_object_mut(), patch.as_object()) else {
        *doc = patch.clone();
        return;
    };
    for (key, change) in changes {
        match change {
            serde_json::Value::Null => {
                fields.remove(key);
            }
            serde_json::Value::Object(_) => {
                let slot = fields
                    .entry(key.clone())
                    .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
                merge_patch(slot, change);
            }
            _ => {
                fields.insert(key.clone(), change.clone());
            }
        }
    }
}
