//! `wip archive-notes`

use anyhow::Result;
use wip::WipService;

pub fn archive(svc: &WipService, actor: &str) -> Result<()> {
    let outcome = svc.archive_notes(actor)?;
    println!("{} ({} archived)", outcome.message, outcome.archived);
    Ok(())
}
