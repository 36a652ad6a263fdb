//! `wip import-csv` and `wip clear-orders`.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use wip::service::ImportOutcome;
use wip::WipService;

/// Read the sheet at `file` and load it onto the board, or into the
/// archive when `archive` is set.
pub fn import_csv(
    svc: &WipService,
    file: &Path,
    archive: bool,
    month: Option<&str>,
    actor: &str,
) -> Result<ImportOutcome> {
    let input = File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
    let sheet = wip::import::read_sheet(input)?;
    let outcome = if archive {
        svc.import_archived(sheet, month, actor)?
    } else {
        svc.import_orders(sheet, actor)?
    };
    Ok(outcome)
}

pub fn report(outcome: &ImportOutcome) {
    match &outcome.archive_month {
        Some(month) => println!("Archived {} order(s) under {}.", outcome.imported, month),
        None => println!("Imported {} order(s).", outcome.imported),
    }
    if outcome.skipped > 0 {
        println!("Skipped {} row(s) missing customer, unit or RO.", outcome.skipped);
    }
}

pub fn clear(svc: &WipService, actor: &str) -> Result<()> {
    let removed = svc.clear_orders(actor)?;
    println!("Deleted {} active order(s).", removed);
    Ok(())
}
