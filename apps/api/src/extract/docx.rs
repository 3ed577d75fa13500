use std::io::{Cursor, Read};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExtractionError, TextExtractor};

static XML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("hard-coded pattern"));

/// DOCX text extraction: the file is a zip container whose body text lives in
/// `word/document.xml`. Paragraph closes become newlines, remaining markup is
/// stripped, and the handful of XML entities that survive are decoded.
pub struct DocxExtractor;

#[async_trait]
impl TextExtractor for DocxExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(raw))
            .map_err(|e| ExtractionError::CorruptFile(format!("not a docx container: {e}")))?;

        let mut document_xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|_| {
                ExtractionError::CorruptFile("missing word/document.xml".to_string())
            })?
            .read_to_string(&mut document_xml)
            .map_err(|e| ExtractionError::CorruptFile(e.to_string()))?;

        Ok(strip_document_xml(&document_xml))
    }
}

fn strip_document_xml(xml: &str) -> String {
    let with_breaks = xml.replace("</w:p>", "\n");
    let stripped = XML_TAG.replace_all(&with_breaks, "");
    stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_extracts_paragraph_text() {
        let raw = docx_bytes(
            "<w:document><w:body>\
             <w:p><w:r><w:t>Senior Rust Engineer</w:t></w:r></w:p>\
             <w:p><w:r><w:t>5 years experience &amp; Kafka</w:t></w:r></w:p>\
             </w:body></w:document>",
        );
        let text = DocxExtractor.extract(&raw).await.unwrap();
        assert!(text.contains("Senior Rust Engineer"));
        assert!(text.contains("5 years experience & Kafka"));
    }

    #[tokio::test]
    async fn test_non_zip_bytes_are_corrupt() {
        let err = DocxExtractor.extract(b"just some text").await.unwrap_err();
        assert!(matches!(err, ExtractionError::CorruptFile(_)));
    }

    #[tokio::test]
    async fn test_zip_without_document_xml_is_corrupt() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("unrelated.txt", FileOptions::default())
            .unwrap();
        writer.write_all(b"nope").unwrap();
        let raw = writer.finish().unwrap().into_inner();

        let err = DocxExtractor.extract(&raw).await.unwrap_err();
        assert_eq!(
            err,
            ExtractionError::CorruptFile("missing word/document.xml".to_string())
        );
    }
}
