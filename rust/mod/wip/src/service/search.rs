use serde::Serialize;

use wip_core::ServiceError;

use crate::model::{ArchivedOrder, Order, OrderFields};
use super::{matches_any, WipService};

/// Where a search hit was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSource {
    Current,
    /// Archive month label.
    Archived(String),
}

impl Serialize for SearchSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchSource::Current => serializer.serialize_str("current"),
            SearchSource::Archived(month) => serializer.serialize_str(month),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub source: SearchSource,
    #[serde(flatten)]
    pub fields: OrderFields,
    pub date_added: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<String>,
}

impl From<Order> for SearchHit {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            source: SearchSource::Current,
            fields: o.fields,
            date_added: o.date_added,
            date_completed: None,
        }
    }
}

impl From<ArchivedOrder> for SearchHit {
    fn from(a: ArchivedOrder) -> Self {
        Self {
            id: a.id,
            source: SearchSource::Archived(a.archive_month),
            fields: a.fields,
            date_added: a.date_added,
            date_completed: Some(a.date_completed),
        }
    }
}

fn hit(fields: &OrderFields, q: &str) -> bool {
    matches_any(
        q,
        &[
            fields.customer.as_str(),
            fields.ro.as_str(),
            fields.unit.as_str(),
            fields.bay.as_str(),
            fields.repair_condition.as_str(),
            fields.contact_info.as_str(),
        ],
    )
}

impl WipService {
    /// Search active and archived orders. Active hits come first.
    pub fn search_all(&self, q: &str) -> Result<Vec<SearchHit>, ServiceError> {
        let q = q.trim().to_lowercase();
        if q.is_empty() {
            return Ok(Vec::new());
        }

        let mut current: Vec<Order> = self
            .orders
            .list()?
            .into_iter()
            .filter(|o| hit(&o.fields, &q))
            .collect();
        current.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut archived: Vec<ArchivedOrder> = self
            .archived_orders
            .list()?
            .into_iter()
            .filter(|a| hit(&a.fields, &q))
            .collect();
        archived.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));

        Ok(current
            .into_iter()
            .map(SearchHit::from)
            .chain(archived.into_iter().map(SearchHit::from))
            .collect())
    }
}
