use lopdf::Document;
use tracing::{debug, warn};

use super::PdfError;

/// Text of every page, in page order, one page per chunk.
///
/// A page whose content stream can't be decoded is skipped with a warning.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let document = Document::load_mem(bytes).map_err(|e| PdfError::Unreadable(e.to_string()))?;
    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let mut text = String::new();
    for page_num in pages.keys() {
        match document.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                if !page_text.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err(e) => warn!(page = page_num, "skipping page without text layer: {}", e),
        }
    }

    debug!(pages = pages.len(), chars = text.chars().count(), "extracted PDF text");
    Ok(text)
}
