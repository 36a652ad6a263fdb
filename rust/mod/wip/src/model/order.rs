use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The free-text body of a repair order, shared by active orders, archived
/// orders and PDF import drafts. Every field defaults to an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFields {
    pub customer: String,
    pub unit: String,
    /// Repair order number.
    pub ro: String,
    pub bay: String,
    /// Case number from the dealer case-management PDF.
    pub decisiv_case: String,
    pub first_shift: String,
    pub second_shift: String,
    pub ordered_parts: String,
    pub triage_notes: String,
    pub quote_status: String,
    pub repair_condition: String,
    pub contact_info: String,
    pub account_status: String,
    pub customer_status: String,
    pub call: String,
}

impl OrderFields {
    /// Name of the first required field that is blank, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        [
            ("customer", &self.customer),
            ("unit", &self.unit),
            ("ro", &self.ro),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// "Customer - RO 1234", for audit entries and log lines.
    pub fn display_name(&self) -> String {
        format!("{} - RO {}", self.customer.trim(), self.ro.trim())
    }

    /// An order counts as completed once either status field says so.
    pub fn looks_completed(&self) -> bool {
        self.customer_status.to_lowercase().contains("complete")
            || self.repair_condition.to_lowercase().contains("complete")
    }
}

/// An active repair order on the shop board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: String,

    #[serde(flatten)]
    pub fields: OrderFields,

    /// Local calendar day the order was added (`YYYY-MM-DD`).
    #[serde(default)]
    pub date_added: String,

    /// Last time the first-shift notes changed (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_shift_updated_at: Option<String>,

    /// Last time the second-shift notes changed (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_shift_updated_at: Option<String>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Order {
    pub fn new(fields: OrderFields, date_added: NaiveDate) -> Self {
        Self {
            id: String::new(),
            fields,
            date_added: date_added.to_string(),
            first_shift_updated_at: None,
            second_shift_updated_at: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// A completed order, copied verbatim out of the active set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedOrder {
    #[serde(default)]
    pub id: String,

    /// Id the order had while it was active.
    #[serde(default)]
    pub source_id: String,

    #[serde(flatten)]
    pub fields: OrderFields,

    #[serde(default)]
    pub date_added: String,

    /// Month bucket label, e.g. "October 2025".
    pub archive_month: String,

    /// Local calendar day the order was archived (`YYYY-MM-DD`).
    #[serde(default)]
    pub date_completed: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl ArchivedOrder {
    pub fn from_order(order: Order, archive_month: String, completed: NaiveDate) -> Self {
        Self {
            id: String::new(),
            source_id: order.id,
            fields: order.fields,
            date_added: order.date_added,
            archive_month,
            date_completed: completed.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
