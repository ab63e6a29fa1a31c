use std::any::Any;
use std::panic;
use std::path::Path;

use super::ExtractionCause;

/// Extracts text page by page and joins pages with a newline.
///
/// There is no partial recovery: a failure on any page fails the document.
/// `pdf-extract` panics on some malformed inputs, so panics are caught and
/// reported as ordinary extraction failures.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractionCause> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path))
        .map_err(|payload| ExtractionCause::Pdf(panic_message(payload)))?
        .map_err(|e| ExtractionCause::Pdf(e.to_string()))?;

    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages.join("\n").trim().to_string()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("PDF parser panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("PDF parser panicked: {msg}")
    } else {
        "PDF parser panicked".to_string()
    }
}
