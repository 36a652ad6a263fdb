//! Order import from dealer case PDFs.
//!
//! The text layer is pulled out with lopdf, then a fixed sequence of
//! patterns fills an [`OrderFields`] draft. Extraction is best-effort: a
//! pattern that finds nothing leaves its field empty.

mod extract;
mod notes;
mod text;

use thiserror::Error;
use wip_core::ServiceError;

use crate::model::OrderFields;

pub use extract::extract_text;
pub use text::parse_order_text;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("unreadable PDF: {0}")]
    Unreadable(String),

    #[error("PDF has no pages")]
    NoPages,
}

impl From<PdfError> for ServiceError {
    fn from(e: PdfError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

/// Extract the text layer and parse it into an order draft.
pub fn parse_order_pdf(bytes: &[u8]) -> Result<OrderFields, PdfError> {
    let text = extract_text(bytes)?;
    Ok(parse_order_text(&text))
}
