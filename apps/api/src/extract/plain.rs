use async_trait::async_trait;

use super::{ExtractionError, TextExtractor};

/// Plain-text passthrough. Invalid UTF-8 is replaced rather than rejected —
/// a resume with a stray byte should still be scorable.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_utf8_passthrough() {
        let text = PlainTextExtractor.extract("hello résumé".as_bytes()).await.unwrap();
        assert_eq!(text, "hello résumé");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_rejected() {
        let text = PlainTextExtractor.extract(&[b'o', b'k', 0xFF, b'!']).await.unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
    }
}
