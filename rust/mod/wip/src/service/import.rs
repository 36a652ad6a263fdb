use serde::Serialize;
use tracing::info;

use wip_core::{new_id, ServiceError};

use crate::import::SheetRows;
use crate::model::*;
use super::WipService;

/// Result of loading a spreadsheet export.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
    /// Archive month the rows went under, when imported as archives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_month: Option<String>,
}

impl WipService {
    /// Add sheet rows to the board as active orders dated today.
    pub fn import_orders(&self, sheet: SheetRows, actor: &str) -> Result<ImportOutcome, ServiceError> {
        let today = self.today();
        let drafts = sheet
            .rows
            .into_iter()
            .map(|fields| Order::new(fields, today))
            .collect();
        let saved = self.orders.save_new_batch(drafts)?;
        info!(imported = saved.len(), skipped = sheet.skipped, "imported orders from sheet");

        for order in &saved {
            self.audit(HistoryEntry::new(
                ActionType::Create,
                EntityType::Order,
                &order.id,
                order.fields.display_name(),
                actor,
                serde_json::json!({ "source": "csv" }),
            ));
        }
        Ok(ImportOutcome {
            imported: saved.len(),
            skipped: sheet.skipped,
            archive_month: None,
        })
    }

    /// Load a month's sheet straight into the archive. Each row gets an
    /// order id of its own, recorded as the archive copy's source.
    pub fn import_archived(
        &self,
        sheet: SheetRows,
        month: Option<&str>,
        actor: &str,
    ) -> Result<ImportOutcome, ServiceError> {
        let label = self.archive_month(month)?;
        let today = self.today();
        let copies = sheet
            .rows
            .into_iter()
            .map(|fields| {
                let mut order = Order::new(fields, today);
                order.id = new_id();
                ArchivedOrder::from_order(order, label.clone(), today)
            })
            .collect();
        let saved = self.archived_orders.save_new_batch(copies)?;
        info!(imported = saved.len(), skipped = sheet.skipped, month = %label, "imported archive sheet");

        for archived in &saved {
            self.audit(HistoryEntry::new(
                ActionType::Archive,
                EntityType::Order,
                &archived.source_id,
                archived.fields.display_name(),
                actor,
                serde_json::json!({ "source": "csv", "archiveMonth": label }),
            ));
        }
        Ok(ImportOutcome {
            imported: saved.len(),
            skipped: sheet.skipped,
            archive_month: Some(label),
        })
    }

    /// Remove every active order. Archives and notes are untouched.
    pub fn clear_orders(&self, actor: &str) -> Result<usize, ServiceError> {
        let orders = self.orders.list()?;
        let ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
        self.orders.delete_batch(&ids)?;
        info!(removed = ids.len(), "cleared active orders");

        for order in &orders {
            self.audit(HistoryEntry::new(
                ActionType::Delete,
                EntityType::Order,
                &order.id,
                order.fields.display_name(),
                actor,
                serde_json::json!({ "reason": "board cleared" }),
            ));
        }
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{failing_harness, fields, harness};
    use super::*;
    use wip_core::ListParams;

    fn sheet(rows: Vec<OrderFields>, skipped: usize) -> SheetRows {
        SheetRows { rows, skipped }
    }

    #[test]
    fn sheet_rows_become_orders_dated_today() {
        let h = harness("2025-10-14T23:30:00-05:00");
        let outcome = h
            .svc
            .import_orders(sheet(vec![fields("Acme", "T1", "100"), fields("Bolt", "T2", "200")], 3), "cli")
            .unwrap();
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.skipped, 3);
        assert!(outcome.archive_month.is_none());

        let page = h.svc.list_orders(&ListParams::default()).unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|o| o.date_added == "2025-10-14"));
        assert_eq!(h.svc.history.count().unwrap(), 2);
    }

    #[test]
    fn archive_sheet_lands_in_named_month() {
        let h = harness("2025-12-02T10:00:00-05:00");
        let outcome = h
            .svc
            .import_archived(sheet(vec![fields("Acme", "T1", "100")], 0), Some("Nov 2025"), "cli")
            .unwrap();
        assert_eq!(outcome.archive_month.as_deref(), Some("November 2025"));

        let november = h.svc.archives_for_month("November 2025").unwrap();
        assert_eq!(november.len(), 1);
        assert_eq!(november[0].source_id.len(), 32);
        assert_eq!(november[0].date_completed, "2025-12-02");
        assert_eq!(h.svc.orders.count().unwrap(), 0);

        assert!(matches!(
            h.svc.import_archived(sheet(vec![], 0), Some("whenever"), "cli"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn clear_empties_board_only() {
        let h = harness("2025-10-14T12:00:00-05:00");
        let order = h.svc.create_order(fields("Acme", "T1", "100"), "a").unwrap();
        h.svc.create_order(fields("Bolt", "T2", "200"), "a").unwrap();
        h.svc.archive_order(&order.id, None, "a").unwrap();

        assert_eq!(h.svc.clear_orders("cli").unwrap(), 1);
        assert_eq!(h.svc.orders.count().unwrap(), 0);
        assert_eq!(h.svc.archived_orders.count().unwrap(), 1);
        assert_eq!(h.svc.clear_orders("cli").unwrap(), 0);
    }

    #[test]
    fn failed_clear_records_nothing() {
        let (h, store) = failing_harness("2025-10-14T12:00:00-05:00");
        h.svc.create_order(fields("Acme", "T1", "100"), "a").unwrap();
        let before = h.svc.history.count().unwrap();
        store.fail_deletes(true);

        assert!(h.svc.clear_orders("cli").is_err());
        assert_eq!(h.svc.orders.count().unwrap(), 1);
        assert_eq!(h.svc.history.count().unwrap(), before);
    }
}
