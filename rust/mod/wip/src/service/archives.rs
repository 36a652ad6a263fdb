use std::cmp::Ordering;

use tracing::info;

use wip_core::ServiceError;

use crate::bucket::{newest_month_first, Grouped, MonthLabel};
use crate::model::{ActionType, ArchivedOrder, EntityType, HistoryEntry};
use super::{DedupeOutcome, WipService};

/// Creation time, or the completion day for copies that predate it.
fn recency(archived: &ArchivedOrder) -> &str {
    if archived.created_at.is_empty() {
        &archived.date_completed
    } else {
        &archived.created_at
    }
}

fn newest_archived_first(a: &ArchivedOrder, b: &ArchivedOrder) -> Ordering {
    recency(b).cmp(recency(a))
}

impl WipService {
    /// Every archived order, keyed by archive month, newest month first and
    /// newest archived first within a month.
    pub fn archives_by_month(&self) -> Result<Grouped<ArchivedOrder>, ServiceError> {
        let archived = self.archived_orders.list()?;
        Ok(Grouped::partition(archived, |a| a.archive_month.clone())
            .sort_keys_by(newest_month_first)
            .sort_items_by(|a, b| b.created_at.cmp(&a.created_at)))
    }

    /// Archived orders for one month (`"October 2025"`, `"October-2025"`,
    /// `"Oct 2025"`), most recently completed first.
    pub fn archives_for_month(&self, label: &str) -> Result<Vec<ArchivedOrder>, ServiceError> {
        let wanted = label
            .parse::<MonthLabel>()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let mut archived: Vec<ArchivedOrder> = self
            .archived_orders
            .list()?
            .into_iter()
            .filter(|a| a.archive_month.parse::<MonthLabel>().ok() == Some(wanted))
            .collect();
        archived.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));
        Ok(archived)
    }

    /// Archived orders sharing an RO number across all months, keyed by RO,
    /// most recently created first within each group.
    pub fn archive_duplicates(&self) -> Result<Grouped<ArchivedOrder>, ServiceError> {
        let archived = self
            .archived_orders
            .list()?
            .into_iter()
            .filter(|a| !a.fields.ro.trim().is_empty());
        Ok(Grouped::partition(archived, |a| a.fields.ro.trim().to_string())
            .retain(|_, members| members.len() > 1)
            .sort_keys_by(|a, b| a.cmp(b))
            .sort_items_by(newest_archived_first))
    }

    /// Keep the most recently created archive copy per RO and delete the rest.
    pub fn dedupe_archives(&self, actor: &str) -> Result<DedupeOutcome, ServiceError> {
        let groups = self.archive_duplicates()?.into_groups();
        let doomed: Vec<(&ArchivedOrder, &ArchivedOrder)> = groups
            .iter()
            .filter_map(|(_, members)| members.split_first())
            .flat_map(|(keep, rest)| rest.iter().map(move |copy| (keep, copy)))
            .collect();
        let removed: Vec<String> = doomed.iter().map(|(_, copy)| copy.id.clone()).collect();

        self.archived_orders.delete_batch(&removed)?;
        for (keep, copy) in doomed {
            self.audit(HistoryEntry::new(
                ActionType::Delete,
                EntityType::Order,
                &copy.id,
                copy.fields.display_name(),
                actor,
                serde_json::json!({
                    "reason": "duplicate archived RO",
                    "keptId": keep.id,
                    "archiveMonth": copy.archive_month,
                }),
            ));
        }
        info!(groups = groups.len(), removed = removed.len(), "deduplicated archived orders");
        Ok(DedupeOutcome {
            kept: groups.len(),
            removed: removed.len(),
            removed_ids: removed,
        })
    }

    pub fn delete_archived_order(&self, id: &str, actor: &str) -> Result<ArchivedOrder, ServiceError> {
        let archived = self.archived_orders.delete(id)?;
        info!(id = %id, ro = %archived.fields.ro, month = %archived.archive_month, "deleted archived order");

        self.audit(HistoryEntry::new(
            ActionType::Delete,
            EntityType::Order,
            &archived.id,
            archived.fields.display_name(),
            actor,
            serde_json::json!({ "archiveMonth": archived.archive_month }),
        ));
        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{fields, harness, Harness};
    use super::*;

    /// Archive a fresh order under `month` and return the copy.
    fn archived(h: &Harness, customer: &str, ro: &str, month: &str) -> ArchivedOrder {
        let order = h.svc.create_order(fields(customer, "T1", ro), "a").unwrap();
        h.svc.archive_order(&order.id, Some(month), "a").unwrap()
    }

    #[test]
    fn groups_newest_month_first() {
        let h = harness("2025-10-14T12:00:00-05:00");
        for (ro, month) in [("1", "August 2025"), ("2", "October 2025"), ("3", "August 2025")] {
            let order = h.svc.create_order(fields("Acme", "T1", ro), "a").unwrap();
            h.svc.archive_order(&order.id, Some(month), "a").unwrap();
        }

        let grouped = h.svc.archives_by_month().unwrap();
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["October 2025", "August 2025"]);
        assert_eq!(grouped.get("August 2025").unwrap().len(), 2);

        let json = serde_json::to_value(&grouped).unwrap();
        assert_eq!(json["October 2025"][0]["ro"], "2");
    }

    #[test]
    fn month_lookup_accepts_hyphen_form() {
        let h = harness("2025-10-03T12:00:00-05:00");
        let a = h.svc.create_order(fields("Acme", "T1", "1"), "a").unwrap();
        h.svc.archive_order(&a.id, None, "a").unwrap();

        h.set_time("2025-10-20T12:00:00-05:00");
        let b = h.svc.create_order(fields("Bolt", "T2", "2"), "a").unwrap();
        h.svc.archive_order(&b.id, None, "a").unwrap();

        let october = h.svc.archives_for_month("October-2025").unwrap();
        let ros: Vec<&str> = october.iter().map(|o| o.fields.ro.as_str()).collect();
        assert_eq!(ros, vec!["2", "1"]);

        assert!(h.svc.archives_for_month("September 2025").unwrap().is_empty());
        assert!(matches!(
            h.svc.archives_for_month("someday"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn archive_duplicates_span_months() {
        let h = harness("2025-12-02T12:00:00-05:00");
        let older = archived(&h, "Acme", "100", "November 2025");
        let newer = archived(&h, "Acme", " 100 ", "December 2025");
        archived(&h, "Bolt", "200", "December 2025");

        let dupes = h.svc.archive_duplicates().unwrap();
        assert_eq!(dupes.keys().collect::<Vec<_>>(), vec!["100"]);
        let ids: Vec<&str> = dupes.get("100").unwrap().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);
    }

    #[test]
    fn recency_falls_back_to_completion_day() {
        let mut a = ArchivedOrder::from_order(
            crate::model::Order::new(fields("A", "1", "9"), chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            "January 2025".into(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
        );
        let mut b = a.clone();
        b.date_completed = "2025-01-05".into();
        assert_eq!(newest_archived_first(&a, &b), Ordering::Less);

        a.created_at = "2025-01-02T00:00:00.000000000Z".into();
        b.created_at = "2025-01-03T00:00:00.000000000Z".into();
        assert_eq!(newest_archived_first(&a, &b), Ordering::Greater);
    }

    #[test]
    fn dedupe_archives_keeps_newest_copy() {
        let h = harness("2025-12-02T12:00:00-05:00");
        let older = archived(&h, "Acme", "100", "November 2025");
        let newer = archived(&h, "Acme", "100", "November 2025");
        archived(&h, "Bolt", "200", "November 2025");

        let outcome = h.svc.dedupe_archives("a").unwrap();
        assert_eq!(outcome.kept, 1);
        assert_eq!(outcome.removed_ids, vec![older.id.clone()]);
        assert!(h.svc.archived_orders.get(&newer.id).unwrap().is_some());
        assert_eq!(h.svc.archived_orders.count().unwrap(), 2);
        assert!(h.svc.archive_duplicates().unwrap().is_empty());

        let entry = h
            .svc
            .history
            .list()
            .unwrap()
            .into_iter()
            .find(|e| e.action_type == ActionType::Delete)
            .unwrap();
        assert_eq!(entry.entity_id, older.id);
        assert_eq!(entry.changes["keptId"], newer.id.as_str());
    }

    #[test]
    fn delete_archived_order_by_id() {
        let h = harness("2025-12-02T12:00:00-05:00");
        let copy = archived(&h, "Acme", "100", "November 2025");

        let deleted = h.svc.delete_archived_order(&copy.id, "a").unwrap();
        assert_eq!(deleted.fields.ro, "100");
        assert!(h.svc.archives_for_month("November 2025").unwrap().is_empty());
        assert!(matches!(
            h.svc.delete_archived_order(&copy.id, "a"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
