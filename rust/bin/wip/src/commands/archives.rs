//! Archive cleanup: duplicate ROs across months, single deletes.

use anyhow::Result;
use wip::model::ArchivedOrder;
use wip::WipService;

fn archived_row(archived: &ArchivedOrder) -> String {
    format!(
        "{:<10} {:<24} {:<16} {:<32} {}",
        archived.fields.ro.trim(),
        super::orders::truncate(archived.fields.customer.trim(), 24),
        archived.archive_month,
        archived.created_at,
        archived.id
    )
}

pub fn duplicates(svc: &WipService, json_output: bool) -> Result<()> {
    let groups = svc.archive_duplicates()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }
    if groups.is_empty() {
        println!("No duplicate archived ROs.");
        return Ok(());
    }
    println!(
        "{:<10} {:<24} {:<16} {:<32} {}",
        "RO", "CUSTOMER", "MONTH", "CREATED", "ID"
    );
    for (ro, copies) in groups.into_groups() {
        println!("# RO {} ({} copies, first is kept by dedupe-archives)", ro, copies.len());
        for copy in &copies {
            println!("{}", archived_row(copy));
        }
    }
    Ok(())
}

pub fn dedupe(svc: &WipService, actor: &str) -> Result<()> {
    let outcome = svc.dedupe_archives(actor)?;
    println!(
        "Removed {} duplicate archived order(s); {} RO group(s) kept.",
        outcome.removed, outcome.kept
    );
    for id in &outcome.removed_ids {
        println!("  deleted {}", id);
    }
    Ok(())
}

pub fn delete(svc: &WipService, id: &str, actor: &str) -> Result<()> {
    let archived = svc.delete_archived_order(id, actor)?;
    println!(
        "Deleted archived order {} ({}, {}).",
        archived.id,
        archived.fields.display_name(),
        archived.archive_month
    );
    Ok(())
}
