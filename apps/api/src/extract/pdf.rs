use async_trait::async_trait;

use super::{ExtractionError, TextExtractor};

/// PDF text extraction via `pdf-extract`. The parse is CPU-bound and runs on
/// the blocking pool; a panic inside the parser surfaces as `CorruptFile`.
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractionError> {
        let data = raw.to_vec();
        let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| ExtractionError::CorruptFile(format!("pdf parser aborted: {e}")))?;

        parsed.map_err(|e| ExtractionError::CorruptFile(e.to_string()))
    }
}
