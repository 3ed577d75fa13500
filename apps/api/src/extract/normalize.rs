//! Text Normalizer — turns one staged upload into a `DocumentRecord`.
//!
//! The oracle is sensitive to noisy input length and formatting, so every
//! extracted text passes the canonicalization filter before it goes anywhere
//! near a prompt: markup and URLs dropped, control characters stripped,
//! whitespace collapsed.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{DocumentRecord, ExtractorSet};
use crate::intake::identifier::DocId;
use crate::intake::StagedFile;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("hard-coded pattern"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://|www\.)\S+").expect("hard-coded pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("hard-coded pattern"));

/// Canonicalizes extracted text for oracle consumption.
pub fn canonicalize(text: &str) -> String {
    let no_markup = MARKUP.replace_all(text, " ");
    let no_urls = URL.replace_all(&no_markup, " ");
    let printable: String = no_urls
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    WHITESPACE.replace_all(&printable, " ").trim().to_string()
}

/// Converts one staged file into a `DocumentRecord`, delegating to the
/// format's extraction collaborator. Extraction failure never aborts the
/// batch: the failing record keeps empty text and carries the error, so it
/// still appears (scored 0) in the final outcome.
pub async fn normalize(id: DocId, staged: StagedFile, extractors: &ExtractorSet) -> DocumentRecord {
    let StagedFile {
        display_name,
        bytes,
        format,
    } = staged;

    let format = match format {
        Ok(format) => format,
        Err(err) => {
            warn!("'{display_name}' not extractable: {err}");
            return DocumentRecord::failed(id, display_name, bytes, err);
        }
    };

    match extractors.extract(format, &bytes).await {
        Ok(text) => DocumentRecord {
            id,
            display_name,
            text: canonicalize(&text),
            raw_bytes: bytes,
            extraction_error: None,
        },
        Err(err) => {
            warn!("text extraction failed for '{display_name}': {err}");
            DocumentRecord::failed(id, display_name, bytes, err)
        }
    }
}
