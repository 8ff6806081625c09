use anyhow::{anyhow, Result};

/// Per-page text joined with `\n`. Pages without a text layer contribute an empty line.
pub(super) fn extract(bytes: &[u8]) -> Result<String> {
    Ok(pages(bytes)?.join("\n"))
}

fn pages(bytes: &[u8]) -> Result<Vec<String>> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| anyhow!("PDF parser panicked: {}", panic_message(&payload)))?
        .map_err(|e| anyhow!("{e}"))
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
