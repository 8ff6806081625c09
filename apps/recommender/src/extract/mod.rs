//! Resume text extraction. The format is chosen purely by file extension, and the
//! caller decides which formats it accepts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::debug;

mod docx;
mod pdf;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Resume file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file format. Only {} are supported.", .0.describe())]
    UnsupportedFormat(AcceptedFormats),

    #[error("Error extracting text from {format}: {source}")]
    Extraction {
        format: DocumentFormat,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    /// Case-insensitive extension lookup.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" => Some(DocumentFormat::Text),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Docx => f.write_str("DOCX"),
            DocumentFormat::Text => f.write_str("TXT"),
        }
    }
}

/// Which formats a caller reads. The model pipeline takes documents only; keyword
/// mode also takes plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedFormats {
    Documents,
    DocumentsAndText,
}

impl AcceptedFormats {
    pub fn accepts(self, format: DocumentFormat) -> bool {
        match format {
            DocumentFormat::Pdf | DocumentFormat::Docx => true,
            DocumentFormat::Text => self == AcceptedFormats::DocumentsAndText,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            AcceptedFormats::Documents => ".pdf and .docx",
            AcceptedFormats::DocumentsAndText => ".pdf, .docx, and .txt",
        }
    }
}

/// Reads a resume and returns its plain text.
///
/// PDF pages and DOCX paragraphs are joined with `\n`. There is no partial-text
/// fallback: any parser failure is returned as [`ExtractError::Extraction`].
pub fn extract_text(path: &Path, accepted: AcceptedFormats) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    let format = DocumentFormat::from_path(path)
        .filter(|format| accepted.accepts(*format))
        .ok_or(ExtractError::UnsupportedFormat(accepted))?;

    let bytes = std::fs::read(path).map_err(|e| ExtractError::Extraction {
        format,
        source: e.into(),
    })?;

    let text = match format {
        DocumentFormat::Pdf => pdf::extract(&bytes),
        DocumentFormat::Docx => docx::extract(&bytes),
        DocumentFormat::Text => String::from_utf8(bytes).context("file is not valid UTF-8"),
    }
    .map_err(|source| ExtractError::Extraction { format, source })?;

    debug!(
        "Extracted {} characters from {} ({format})",
        text.len(),
        path.display()
    );
    Ok(text)
}
