//! Text extraction collaborators — one adapter per supported file format,
//! behind a common trait so any of them can be swapped or absent at runtime.
//!
//! Extraction failure is always local to one document: the record still
//! enters the pipeline with empty text and the error recorded, so it shows up
//! (scored 0) in the final outcome instead of vanishing.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::intake::identifier::DocId;

pub mod docx;
pub mod legacy_doc;
pub mod normalize;
pub mod pdf;
pub mod plain;

/// Why one document's text could not be extracted. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("file could not be parsed: {0}")]
    CorruptFile(String),

    #[error("extraction backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Supported document formats, sniffed from the declared content type with
/// the file extension as fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pdf,
    Docx,
    LegacyDoc,
    PlainText,
}

impl FileFormat {
    pub fn sniff(display_name: &str, content_type: Option<&str>) -> Option<Self> {
        match content_type {
            Some("application/pdf") => return Some(FileFormat::Pdf),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                return Some(FileFormat::Docx)
            }
            Some("application/msword") => return Some(FileFormat::LegacyDoc),
            Some("text/plain") => return Some(FileFormat::PlainText),
            _ => {}
        }

        match extension(display_name)?.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileFormat::Pdf),
            "docx" => Some(FileFormat::Docx),
            "doc" => Some(FileFormat::LegacyDoc),
            "txt" => Some(FileFormat::PlainText),
            _ => None,
        }
    }
}

fn extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext)
}

/// One format-specific extraction collaborator: raw bytes in, plain text out.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractionError>;
}

/// The full set of extraction collaborators, dispatched by format.
pub struct ExtractorSet {
    pdf: Box<dyn TextExtractor>,
    docx: Box<dyn TextExtractor>,
    legacy_doc: Box<dyn TextExtractor>,
    plain: Box<dyn TextExtractor>,
}

impl ExtractorSet {
    /// The production wiring: in-process pdf/docx/plain readers plus the
    /// external `antiword` converter for legacy .doc files.
    pub fn native() -> Self {
        Self {
            pdf: Box::new(pdf::PdfExtractor),
            docx: Box::new(docx::DocxExtractor),
            legacy_doc: Box::new(legacy_doc::LegacyDocExtractor::default()),
            plain: Box::new(plain::PlainTextExtractor),
        }
    }

    pub async fn extract(
        &self,
        format: FileFormat,
        raw: &[u8],
    ) -> Result<String, ExtractionError> {
        match format {
            FileFormat::Pdf => self.pdf.extract(raw).await,
            FileFormat::Docx => self.docx.extract(raw).await,
            FileFormat::LegacyDoc => self.legacy_doc.extract(raw).await,
            FileFormat::PlainText => self.plain.extract(raw).await,
        }
    }
}

/// One uploaded document after normalization. `text` is populated exactly
/// once by the normalizer and read-only afterwards; `raw_bytes` is handed to
/// the persistence collaborator once the scorecard is final.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: DocId,
    pub display_name: String,
    pub raw_bytes: Bytes,
    /// Extracted plain text; empty string when extraction failed.
    pub text: String,
    pub extraction_error: Option<ExtractionError>,
}

impl DocumentRecord {
    pub fn failed(
        id: DocId,
        display_name: String,
        raw_bytes: Bytes,
        error: ExtractionError,
    ) -> Self {
        Self {
            id,
            display_name,
            raw_bytes,
            text: String::new(),
            extraction_error: Some(error),
        }
    }
}
