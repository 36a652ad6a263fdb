use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::notes::{note_blocks, shift_notes};
use crate::model::OrderFields;

static CASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Case\s*#\s*(\d+)").unwrap());

static CUSTOMER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Customer:\s*([^(\n]+?)(?:\s+Date:|\s+\d{1,2}/\d{1,2}/|\n|$)").unwrap()
});

static UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Unit\s+No:\s*(\S+)").unwrap());

static RO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Repair\s+Order:\s*(\d+)").unwrap());

static COMPLAINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Complaint:\s*([^\n]+?)(?:\n|Cause:|$)").unwrap());

static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Status:\s*([^\n]+?)(?:\s+ETR:|\s+\d{1,2}/\d{1,2}/|\n|$)").unwrap()
});

static PARTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:pull|order|part)[^:\n]*:[ \t]*([^\n]+)").unwrap());

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

/// Parts lines shorter than this are labels, not content.
const MIN_PART_LEN: usize = 6;

/// Words in the status that mean the unit is physically somewhere.
const LOCATION_HINTS: [&str; 3] = ["road test", "bay", "shop"];

fn first_capture(re: &Regex, text: &str, field: &str) -> String {
    match re.captures(text).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => {
            debug!(field, "no match in PDF text");
            String::new()
        }
    }
}

fn parts_lines(text: &str) -> String {
    let parts: Vec<&str> = PARTS_RE
        .captures_iter(text)
        .filter(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            let before = text[..start].trim_end_matches([' ', '\t']);
            !(before.len() < start && before.to_lowercase().ends_with("repair"))
        })
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()))
        .filter(|part| part.len() >= MIN_PART_LEN)
        .collect();
    if parts.is_empty() {
        debug!(field = "orderedParts", "no match in PDF text");
    }
    parts.join("\n")
}

fn emails(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for m in EMAIL_RE.find_iter(text) {
        if !seen.contains(&m.as_str()) {
            seen.push(m.as_str());
        }
    }
    if seen.is_empty() {
        debug!(field = "contactInfo", "no match in PDF text");
    }
    seen.join(", ")
}

/// Fill an order draft from case-PDF text. Never fails; fields whose pattern
/// is absent stay empty.
pub fn parse_order_text(text: &str) -> OrderFields {
    let mut fields = OrderFields {
        decisiv_case: first_capture(&CASE_RE, text, "decisivCase"),
        customer: first_capture(&CUSTOMER_RE, text, "customer"),
        unit: first_capture(&UNIT_RE, text, "unit"),
        ro: first_capture(&RO_RE, text, "ro"),
        repair_condition: first_capture(&COMPLAINT_RE, text, "repairCondition"),
        quote_status: first_capture(&STATUS_RE, text, "quoteStatus"),
        ..Default::default()
    };

    let blocks = note_blocks(text);
    if blocks.is_empty() {
        debug!(field = "notes", "no match in PDF text");
    }
    let (first, second) = shift_notes(&blocks);
    fields.first_shift = first;
    fields.second_shift = second;

    fields.ordered_parts = parts_lines(text);
    fields.contact_info = emails(text);

    let status = fields.quote_status.to_lowercase();
    if LOCATION_HINTS.iter().any(|hint| status.contains(hint)) {
        fields.bay = fields.quote_status.clone();
    }

    debug!(
        case = %fields.decisiv_case,
        ro = %fields.ro,
        notes = blocks.len(),
        "parsed order text"
    );
    fields
}
