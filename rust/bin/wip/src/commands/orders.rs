//! Order maintenance: duplicate ROs, dedupe, completed sweeps.

use anyhow::Result;
use wip::model::Order;
use wip::WipService;

/// One table row: RO, customer, unit, last update, id.
fn order_row(order: &Order) -> String {
    format!(
        "{:<10} {:<24} {:<10} {:<32} {}",
        order.fields.ro.trim(),
        truncate(order.fields.customer.trim(), 24),
        order.fields.unit.trim(),
        order.updated_at,
        order.id
    )
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

fn header() -> String {
    format!("{:<10} {:<24} {:<10} {:<32} {}", "RO", "CUSTOMER", "UNIT", "UPDATED", "ID")
}

pub fn duplicates(svc: &WipService, json_output: bool) -> Result<()> {
    let groups = svc.duplicate_ros()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }
    if groups.is_empty() {
        println!("No duplicate ROs.");
        return Ok(());
    }
    println!("{}", header());
    for (ro, orders) in groups.into_groups() {
        println!("# RO {} ({} orders, first is kept by dedupe)", ro, orders.len());
        for order in &orders {
            println!("{}", order_row(order));
        }
    }
    Ok(())
}

pub fn dedupe(svc: &WipService, actor: &str) -> Result<()> {
    let outcome = svc.dedupe_orders(actor)?;
    println!(
        "Removed {} duplicate order(s); {} RO group(s) kept.",
        outcome.removed, outcome.kept
    );
    for id in &outcome.removed_ids {
        println!("  deleted {}", id);
    }
    Ok(())
}

pub fn completed(svc: &WipService, json_output: bool) -> Result<()> {
    let orders = svc.completed_orders()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&orders)?);
        return Ok(());
    }
    if orders.is_empty() {
        println!("No completed orders.");
        return Ok(());
    }
    println!("{}", header());
    for order in &orders {
        println!("{}", order_row(order));
    }
    Ok(())
}

pub fn archive_completed(svc: &WipService, month: Option<&str>, actor: &str) -> Result<()> {
    let archived = svc.archive_completed(month, actor)?;
    match archived.first() {
        Some(first) => println!(
            "Archived {} completed order(s) under {}.",
            archived.len(),
            first.archive_month
        ),
        None => println!("No completed orders to archive."),
    }
    Ok(())
}
