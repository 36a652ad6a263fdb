//! Order import from the shop's WIP spreadsheet, exported as CSV.
//!
//! The current-WIP export carries a header row; monthly archive sheets are
//! bare rows in the same fourteen-column order. Both are accepted: if the
//! first row names a `Customer` column it is read as a header, otherwise
//! columns are taken by position.

use std::io::Read;

use serde::Serialize;
use thiserror::Error;
use wip_core::ServiceError;

use crate::model::OrderFields;

/// Sheet column headers, in sheet order.
pub const COLUMNS: [&str; 14] = [
    "Customer",
    "UNIT",
    "R.O.",
    "Bay #",
    "First Shift Notes",
    "Second Shift Notes",
    "Ordered parts/ETA and TCS case #s",
    "Triage Notes",
    "Quote Status",
    "Repair Condition",
    "Contact Info",
    "Account Status",
    "Customer Status",
    "Call",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ImportError> for ServiceError {
    fn from(e: ImportError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

/// Rows that became order drafts, and how many were passed over.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SheetRows {
    pub rows: Vec<OrderFields>,
    pub skipped: usize,
}

/// Sheet column index for a header cell. Case, surrounding space and the
/// short forms `RO` and `Bay` are tolerated.
fn column_for_header(cell: &str) -> Option<usize> {
    let cell = cell.trim();
    match cell.to_ascii_lowercase().as_str() {
        "ro" | "ro #" => Some(2),
        "bay" => Some(3),
        _ => COLUMNS.iter().position(|c| c.eq_ignore_ascii_case(cell)),
    }
}

fn slot(fields: &mut OrderFields, column: usize) -> Option<&mut String> {
    let field = match column {
        0 => &mut fields.customer,
        1 => &mut fields.unit,
        2 => &mut fields.ro,
        3 => &mut fields.bay,
        4 => &mut fields.first_shift,
        5 => &mut fields.second_shift,
        6 => &mut fields.ordered_parts,
        7 => &mut fields.triage_notes,
        8 => &mut fields.quote_status,
        9 => &mut fields.repair_condition,
        10 => &mut fields.contact_info,
        11 => &mut fields.account_status,
        12 => &mut fields.customer_status,
        13 => &mut fields.call,
        _ => return None,
    };
    Some(field)
}

/// Section markers such as `>>> BAY 3 <<<` sit in the customer column.
fn is_importable(fields: &OrderFields) -> bool {
    !fields.customer.starts_with('>')
        && !fields.customer.starts_with('<')
        && fields.missing_required().is_none()
}

/// Read a sheet export. Rows without customer, unit or RO are skipped.
pub fn read_sheet<R: Read>(input: R) -> Result<SheetRows, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut layout: Option<Vec<Option<usize>>> = None;
    let mut sheet = SheetRows::default();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if index == 0 && record.iter().any(|cell| column_for_header(cell) == Some(0)) {
            layout = Some(record.iter().map(column_for_header).collect());
            continue;
        }

        let mut fields = OrderFields::default();
        for (position, value) in record.iter().enumerate() {
            let column = match &layout {
                Some(columns) => columns.get(position).copied().flatten(),
                None => Some(position),
            };
            if let Some(field) = column.and_then(|c| slot(&mut fields, c)) {
                *field = value.to_string();
            }
        }

        if is_importable(&fields) {
            sheet.rows.push(fields);
        } else {
            sheet.skipped += 1;
        }
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_WIP: &str = "\
Customer,UNIT,R.O.,Bay #,First Shift Notes,Second Shift Notes,Ordered parts/ETA and TCS case #s,Triage Notes ,Quote Status,Repair Condition,Contact Info,Account Status,Customer Status,Call
Acme Freight,T-101,884512,4,pulled hub,\"waiting on seal, ETA fri\",seal kit,,sent,in progress,555-0100,COD,waiting,left vm
>>> OUTSIDE <<<,,,,,,,,,,,,,
Bolt Lines,22,,,,,,,,,,,,
,,,,,,,,,,,,,
Cobalt,C-9,  77  ,,,,,,,,,,Complete,
";

    #[test]
    fn header_sheet_maps_named_columns() {
        let sheet = read_sheet(CURRENT_WIP.as_bytes()).unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.skipped, 3);

        let acme = &sheet.rows[0];
        assert_eq!(acme.customer, "Acme Freight");
        assert_eq!(acme.ro, "884512");
        assert_eq!(acme.bay, "4");
        assert_eq!(acme.second_shift, "waiting on seal, ETA fri");
        assert_eq!(acme.ordered_parts, "seal kit");
        assert_eq!(acme.call, "left vm");

        assert_eq!(sheet.rows[1].ro, "77");
        assert_eq!(sheet.rows[1].customer_status, "Complete");
    }

    #[test]
    fn headers_in_any_order_and_case() {
        let csv = "ro,CUSTOMER,Notes nobody reads,unit\n5,Acme,ignored,T1\n";
        let sheet = read_sheet(csv.as_bytes()).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].ro, "5");
        assert_eq!(sheet.rows[0].customer, "Acme");
        assert_eq!(sheet.rows[0].unit, "T1");
        assert_eq!(sheet.rows[0].triage_notes, "");
    }

    #[test]
    fn bare_archive_sheet_reads_by_position() {
        let csv = "Acme,T-1,100,2,a,b\nBolt,T-2,200\n,,,,\n";
        let sheet = read_sheet(csv.as_bytes()).unwrap();
        assert_eq!(sheet.skipped, 1);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].first_shift, "a");
        assert_eq!(sheet.rows[0].second_shift, "b");
        assert_eq!(sheet.rows[1].ro, "200");
        assert_eq!(sheet.rows[1].bay, "");
    }

    #[test]
    fn extra_trailing_cells_are_ignored() {
        let csv = format!("Acme,T-1,100{}\n", ",x".repeat(20));
        let sheet = read_sheet(csv.as_bytes()).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].call, "x");
    }
}
