// Document Scoring Pipeline.
// Implements: two-stage fan-out scheduling over the oracle gateway, score
// parsing, and deterministic aggregation into a ranked scorecard.
// All per-document failures are captured as data on the result structs —
// only the batch-level summarization failure aborts a batch.

use thiserror::Error;
use tracing::warn;

use crate::extract::ExtractionError;
use crate::intake::identifier::DocId;
use crate::oracle::OracleCallError;

pub mod aggregate;
pub mod scheduler;
pub mod score;

pub use aggregate::{BatchOutcome, RankedEntry};
pub use scheduler::score_batch;

/// Why one document ended up with a score of 0. Carried on the result
/// structs and merged into the batch outcome; never thrown past the
/// document's own task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("oracle call failed: {0}")]
    Oracle(#[from] OracleCallError),

    #[error("oracle response contained no score between 0 and 100")]
    ParseFailure,
}

/// The one failure that takes a whole batch down: without a job summary no
/// document can be scored, so no partial scorecard is produced.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("job description could not be summarized: {0}")]
    JobSummary(#[from] OracleCallError),
}

/// Stage-1 outcome for one document. Consumed only by stage 2 for the same
/// document.
#[derive(Debug, Clone)]
pub struct AspectResult {
    pub document_id: DocId,
    pub aspects_text: String,
    pub error: Option<DocumentError>,
}

impl AspectResult {
    pub fn ok(document_id: DocId, aspects_text: String) -> Self {
        Self {
            document_id,
            aspects_text,
            error: None,
        }
    }

    pub fn failed(document_id: DocId, error: DocumentError) -> Self {
        Self {
            document_id,
            aspects_text: String::new(),
            error: Some(error),
        }
    }
}

/// Stage-2 outcome for one document.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub document_id: DocId,
    pub raw_score_text: String,
    pub numeric_score: u32,
    pub error: Option<DocumentError>,
}

impl ScoreResult {
    /// Parses the oracle's free-text scoring response. A response with no
    /// recognizable score is scored 0 and flagged — policy, not silence.
    pub fn from_response(document_id: DocId, raw: String) -> Self {
        match score::parse_score(&raw) {
            Some(numeric_score) => Self {
                document_id,
                raw_score_text: raw,
                numeric_score,
                error: None,
            },
            None => {
                warn!("no parsable score for document {document_id}: {raw:?}");
                Self {
                    document_id,
                    raw_score_text: raw,
                    numeric_score: 0,
                    error: Some(DocumentError::ParseFailure),
                }
            }
        }
    }

    pub fn failed(document_id: DocId, error: DocumentError) -> Self {
        Self {
            document_id,
            raw_score_text: String::new(),
            numeric_score: 0,
            error: Some(error),
        }
    }
}
