//! `wip parse-pdf`: preview what an import would fill in.

use std::path::Path;

use anyhow::Result;

pub fn parse(file: &Path, text_only: bool) -> Result<()> {
    let bytes = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", file.display(), e))?;

    if text_only {
        let text = wip::pdf::extract_text(&bytes)?;
        println!("{}", text);
        return Ok(());
    }

    let draft = wip::pdf::parse_order_pdf(&bytes)?;
    println!("{}", serde_json::to_string_pretty(&draft)?);
    if let Some(field) = draft.missing_required() {
        eprintln!("Note: {} was not found; fill it in before saving.", field);
    }
    Ok(())
}
