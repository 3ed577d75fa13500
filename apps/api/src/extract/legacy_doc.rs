use std::io::Write;

use async_trait::async_trait;
use tokio::process::Command;

use super::{ExtractionError, TextExtractor};

/// Legacy .doc extraction through an external converter binary.
///
/// The converter is a host dependency that may simply not be installed
/// (the format predates open tooling), in which case every .doc document
/// degrades to `BackendUnavailable` instead of failing the batch.
pub struct LegacyDocExtractor {
    command: String,
}

impl LegacyDocExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for LegacyDocExtractor {
    fn default() -> Self {
        Self::new("antiword")
    }
}

#[async_trait]
impl TextExtractor for LegacyDocExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String, ExtractionError> {
        // The converter wants a file path, not stdin.
        let mut staging = tempfile::NamedTempFile::new().map_err(|e| {
            ExtractionError::BackendUnavailable(format!("could not stage temp file: {e}"))
        })?;
        staging
            .write_all(raw)
            .map_err(|e| ExtractionError::BackendUnavailable(e.to_string()))?;

        let output = Command::new(&self.command)
            .arg(staging.path())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionError::BackendUnavailable(format!(
                        "'{}' is not installed on this host",
                        self.command
                    ))
                } else {
                    ExtractionError::BackendUnavailable(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::CorruptFile(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_converter_reports_backend_unavailable() {
        let extractor = LegacyDocExtractor::new("definitely-not-a-real-converter");
        let err = extractor.extract(b"doc bytes").await.unwrap_err();
        match err {
            ExtractionError::BackendUnavailable(msg) => {
                assert!(msg.contains("definitely-not-a-real-converter"))
            }
            other => panic!("expected BackendUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_converter_stdout_becomes_text() {
        // `cat` stands in for the converter: path in, contents out.
        let extractor = LegacyDocExtractor::new("cat");
        let text = extractor.extract(b"converted resume text").await.unwrap();
        assert_eq!(text, "converted resume text");
    }
}
