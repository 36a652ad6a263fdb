use std::cmp::Ordering;

use serde::Serialize;
use tracing::info;

use wip_core::{merge_patch, paginate, stamp_rfc3339, ListParams, ListResult, ServiceError};

use crate::bucket::{Grouped, MonthLabel};
use crate::model::*;
use super::{matches_any, WipService};

/// Keys a patch may not touch; the service owns them.
const PROTECTED_KEYS: [&str; 6] = [
    "id",
    "createdAt",
    "updatedAt",
    "dateAdded",
    "firstShiftUpdatedAt",
    "secondShiftUpdatedAt",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DedupeOutcome {
    pub kept: usize,
    pub removed: usize,
    pub removed_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortKey {
    Customer,
    Ro,
    Unit,
    Bay,
    DateAdded,
    CreatedAt,
}

impl SortKey {
    /// `customer` ascending, `-customer` descending.
    fn parse(raw: &str) -> Result<(Self, bool), ServiceError> {
        let (descending, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        let key = match name {
            "customer" => SortKey::Customer,
            "ro" => SortKey::Ro,
            "unit" => SortKey::Unit,
            "bay" => SortKey::Bay,
            "dateAdded" => SortKey::DateAdded,
            "createdAt" => SortKey::CreatedAt,
            other => {
                return Err(ServiceError::Validation(format!(
                    "unknown sort field '{}'",
                    other
                )))
            }
        };
        Ok((key, descending))
    }

    fn compare(self, a: &Order, b: &Order) -> Ordering {
        let text = |x: &str, y: &str| x.to_lowercase().cmp(&y.to_lowercase());
        match self {
            SortKey::Customer => text(&a.fields.customer, &b.fields.customer),
            SortKey::Ro => text(&a.fields.ro, &b.fields.ro),
            SortKey::Unit => text(&a.fields.unit, &b.fields.unit),
            SortKey::Bay => text(&a.fields.bay, &b.fields.bay),
            SortKey::DateAdded => a.date_added.cmp(&b.date_added),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

fn newest_created_first(a: &Order, b: &Order) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

fn newest_updated_first(a: &Order, b: &Order) -> Ordering {
    b.updated_at
        .cmp(&a.updated_at)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

impl WipService {
    // ── Orders ──

    pub fn list_orders(&self, params: &ListParams) -> Result<ListResult<Order>, ServiceError> {
        let mut orders = self.orders.list()?;

        if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let q = q.to_lowercase();
            orders.retain(|o| {
                matches_any(&q, &[o.fields.customer.as_str(), o.fields.ro.as_str(), o.fields.unit.as_str()])
            });
        }

        match params.sort.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => {
                let (key, descending) = SortKey::parse(raw)?;
                orders.sort_by(|a, b| {
                    let ord = key.compare(a, b);
                    if descending { ord.reverse() } else { ord }
                });
            }
            None => orders.sort_by(newest_created_first),
        }

        Ok(paginate(orders, params))
    }

    pub fn get_order(&self, id: &str) -> Result<Order, ServiceError> {
        self.orders.get_or_err(id)
    }

    pub fn create_order(&self, fields: OrderFields, actor: &str) -> Result<Order, ServiceError> {
        if let Some(field) = fields.missing_required() {
            return Err(ServiceError::required(field));
        }

        let order = self.orders.save_new(Order::new(fields, self.today()))?;
        info!(id = %order.id, ro = %order.fields.ro, "created order");

        self.audit(HistoryEntry::new(
            ActionType::Create,
            EntityType::Order,
            &order.id,
            order.fields.display_name(),
            actor,
            serde_json::to_value(&order.fields).unwrap_or_default(),
        ));
        Ok(order)
    }

    /// Apply a JSON merge-patch. Touching a shift's notes stamps that shift's
    /// update time.
    pub fn update_order(
        &self,
        id: &str,
        mut patch: serde_json::Value,
        actor: &str,
    ) -> Result<Order, ServiceError> {
        let obj = patch
            .as_object_mut()
            .ok_or_else(|| ServiceError::Validation("patch must be a JSON object".into()))?;
        for key in PROTECTED_KEYS {
            obj.remove(key);
        }
        let now = serde_json::Value::String(stamp_rfc3339(&self.now()));
        if obj.contains_key("firstShift") {
            obj.insert("firstShiftUpdatedAt".into(), now.clone());
        }
        if obj.contains_key("secondShift") {
            obj.insert("secondShiftUpdatedAt".into(), now);
        }

        let current = self.orders.get_or_err(id)?;
        let mut json = serde_json::to_value(&current)
            .map_err(|e| ServiceError::Internal(format!("serialize order: {}", e)))?;
        merge_patch(&mut json, &patch);
        let updated: Order = serde_json::from_value(json)
            .map_err(|e| ServiceError::Validation(format!("invalid order: {}", e)))?;
        if let Some(field) = updated.fields.missing_required() {
            return Err(ServiceError::required(field));
        }

        let saved = self.orders.save(updated)?;
        self.audit(HistoryEntry::new(
            ActionType::Update,
            EntityType::Order,
            id,
            saved.fields.display_name(),
            actor,
            patch,
        ));
        Ok(saved)
    }

    pub fn delete_order(&self, id: &str, actor: &str) -> Result<Order, ServiceError> {
        let order = self.orders.delete(id)?;
        info!(id, ro = %order.fields.ro, "deleted order");
        self.audit(HistoryEntry::new(
            ActionType::Delete,
            EntityType::Order,
            id,
            order.fields.display_name(),
            actor,
            serde_json::Value::Null,
        ));
        Ok(order)
    }

    // ── Archiving ──

    /// Canonical archive month: the given label, or the current month.
    pub(super) fn archive_month(&self, month: Option<&str>) -> Result<String, ServiceError> {
        match month.map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => raw
                .parse::<MonthLabel>()
                .map(|label| label.to_string())
                .map_err(|e| ServiceError::Validation(e.to_string())),
            None => Ok(MonthLabel::of(self.today()).to_string()),
        }
    }

    /// Move an order into the archive under `month` (default: this month).
    ///
    /// If an archive copy of this order already exists, only the active
    /// record is removed, so the order appears in its month once.
    pub fn archive_order(
        &self,
        id: &str,
        month: Option<&str>,
        actor: &str,
    ) -> Result<ArchivedOrder, ServiceError> {
        let label = self.archive_month(month)?;
        let order = self.orders.get_or_err(id)?;
        self.archive_loaded(order, &label, actor)
    }

    fn archive_loaded(
        &self,
        order: Order,
        label: &str,
        actor: &str,
    ) -> Result<ArchivedOrder, ServiceError> {
        let id = order.id.clone();
        let existing = self
            .archived_orders
            .list()?
            .into_iter()
            .find(|a| a.source_id == id);

        let archived = match existing {
            Some(archived) => {
                self.orders.delete(&id)?;
                archived
            }
            None => {
                let copy = ArchivedOrder::from_order(order, label.to_string(), self.today());
                self.archived_orders
                    .save_new_batch_moving::<Order>(vec![copy], std::slice::from_ref(&id))?
                    .pop()
                    .ok_or_else(|| ServiceError::Internal("archive copy not written".into()))?
            }
        };
        info!(id = %id, ro = %archived.fields.ro, month = %archived.archive_month, "archived order");

        self.audit(HistoryEntry::new(
            ActionType::Archive,
            EntityType::Order,
            &id,
            archived.fields.display_name(),
            actor,
            serde_json::json!({ "archiveMonth": archived.archive_month }),
        ));
        Ok(archived)
    }

    /// Active orders whose status fields say "complete".
    pub fn completed_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let mut orders: Vec<Order> = self
            .orders
            .list()?
            .into_iter()
            .filter(|o| o.fields.looks_completed())
            .collect();
        orders.sort_by(newest_created_first);
        Ok(orders)
    }

    pub fn archive_completed(
        &self,
        month: Option<&str>,
        actor: &str,
    ) -> Result<Vec<ArchivedOrder>, ServiceError> {
        let label = self.archive_month(month)?;
        let archived = self
            .completed_orders()?
            .into_iter()
            .map(|order| self.archive_loaded(order, &label, actor))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = archived.len(), month = %label, "archived completed orders");
        Ok(archived)
    }

    // ── Duplicate ROs ──

    /// Active orders sharing an RO number, keyed by RO, most recently
    /// updated first within each group.
    pub fn duplicate_ros(&self) -> Result<Grouped<Order>, ServiceError> {
        let orders = self
            .orders
            .list()?
            .into_iter()
            .filter(|o| !o.fields.ro.trim().is_empty());
        Ok(Grouped::partition(orders, |o| o.fields.ro.trim().to_string())
            .retain(|_, members| members.len() > 1)
            .sort_keys_by(|a, b| a.cmp(b))
            .sort_items_by(newest_updated_first))
    }

    /// Keep the most recently updated order per RO and delete the rest.
    pub fn dedupe_orders(&self, actor: &str) -> Result<DedupeOutcome, ServiceError> {
        let groups = self.duplicate_ros()?.into_groups();
        let doomed: Vec<(&Order, &Order)> = groups
            .iter()
            .filter_map(|(_, members)| members.split_first())
            .flat_map(|(keep, rest)| rest.iter().map(move |order| (keep, order)))
            .collect();
        let removed: Vec<String> = doomed.iter().map(|(_, order)| order.id.clone()).collect();

        self.orders.delete_batch(&removed)?;
        for (keep, order) in doomed {
            self.audit(HistoryEntry::new(
                ActionType::Delete,
                EntityType::Order,
                &order.id,
                order.fields.display_name(),
                actor,
                serde_json::json!({ "reason": "duplicate RO", "keptId": keep.id }),
            ));
        }
        info!(groups = groups.len(), removed = removed.len(), "deduplicated orders");
        Ok(DedupeOutcome {
            kept: groups.len(),
            removed: removed.len(),
            removed_ids: removed,
        })
    }
}
