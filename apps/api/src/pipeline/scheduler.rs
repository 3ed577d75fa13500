//! Two-Stage Fan-Out Scheduler — the per-batch state machine.
//!
//! Phases: Summarizing → Extracting → Scoring → Aggregating.
//!
//! One shared job-description summarization gates the batch; its failure is
//! the only batch-fatal one, and it happens before any per-document work is
//! submitted. After that, stage 1 fans out one aspect-extraction call per
//! document and stage 2 one scoring call per document, with a barrier in
//! between: a document's scoring call never starts before its own aspect
//! call has settled, and no ordering exists between different documents.
//! Concurrency is bounded by the oracle gateway, not here.
//!
//! Per-document failures are captured as data and never cancel siblings;
//! every record that enters produces exactly one scorecard entry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::aggregate::{rank, BatchOutcome, RankedEntry};
use super::{AspectResult, BatchError, DocumentError, ScoreResult};
use crate::extract::DocumentRecord;
use crate::intake::identifier::DocId;
use crate::oracle::{OracleCallError, OracleGateway};

/// Runs one batch through all four phases and returns the ranked outcome.
pub async fn score_batch(
    gateway: &OracleGateway,
    job_description: &str,
    records: &[DocumentRecord],
) -> Result<BatchOutcome, BatchError> {
    // Summarizing: single call, shared by every scoring task. Nothing else
    // has been submitted yet, so a failure here wastes no per-document calls.
    info!("summarizing job description for {} document(s)", records.len());
    let summary = Arc::new(gateway.summarize_job_description(job_description).await?);

    // Extracting: one task per record, all settled before scoring starts.
    // Records whose extraction already failed are pinned to score 0, so an
    // aspect call on their empty text would be wasted — synthesize instead.
    let aspects: Arc<DashMap<DocId, AspectResult>> = Arc::new(DashMap::new());
    let mut pending: Vec<(DocId, JoinHandle<()>)> = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id.clone();
        if let Some(err) = &record.extraction_error {
            aspects.insert(
                id.clone(),
                AspectResult::failed(id, DocumentError::Extraction(err.clone())),
            );
            continue;
        }

        let gateway = gateway.clone();
        let results = Arc::clone(&aspects);
        let text = record.text.clone();
        pending.push((
            id.clone(),
            tokio::spawn(async move {
                let result = match gateway.extract_aspects(&text).await {
                    Ok(aspects_text) => AspectResult::ok(id.clone(), aspects_text),
                    Err(err) => AspectResult::failed(id.clone(), DocumentError::Oracle(err)),
                };
                results.insert(id, result);
            }),
        ));
    }
    settle(pending, &aspects, |id, err| AspectResult::failed(id, err)).await;
    let extracted = aspects.iter().filter(|r| r.error.is_none()).count();
    info!(
        "aspect extraction settled: {extracted}/{} succeeded",
        records.len()
    );

    // Scoring: oracle call only where stage 1 succeeded; everything else
    // gets a synthesized zero without spending a call.
    let scores: Arc<DashMap<DocId, ScoreResult>> = Arc::new(DashMap::new());
    let mut pending: Vec<(DocId, JoinHandle<()>)> = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id.clone();
        let staged = aspects
            .get(&id)
            .map(|r| (r.aspects_text.clone(), r.error.clone()));
        match staged {
            None => {
                // Unreachable by construction: stage 1 settles every key.
                scores.insert(
                    id.clone(),
                    ScoreResult::failed(id, missing_result("aspect result missing")),
                );
            }
            Some((_, Some(err))) => {
                scores.insert(id.clone(), ScoreResult::failed(id, err));
            }
            Some((aspects_text, None)) => {
                let gateway = gateway.clone();
                let summary = Arc::clone(&summary);
                let results = Arc::clone(&scores);
                pending.push((
                    id.clone(),
                    tokio::spawn(async move {
                        let result = match gateway.score_against_job(&aspects_text, &summary).await
                        {
                            Ok(raw) => ScoreResult::from_response(id.clone(), raw),
                            Err(err) => {
                                ScoreResult::failed(id.clone(), DocumentError::Oracle(err))
                            }
                        };
                        results.insert(id, result);
                    }),
                ));
            }
        }
    }
    settle(pending, &scores, |id, err| ScoreResult::failed(id, err)).await;
    info!("scoring settled for {} document(s)", records.len());

    // Aggregating: merge by identifier onto display names, arrival order,
    // then rank.
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let score = scores
            .remove(&record.id)
            .map(|(_, result)| result)
            .unwrap_or_else(|| {
                ScoreResult::failed(record.id.clone(), missing_result("score result missing"))
            });
        let key_aspects = aspects
            .get(&record.id)
            .filter(|r| r.error.is_none())
            .map(|r| r.aspects_text.clone());
        entries.push(RankedEntry {
            document_id: record.id.clone(),
            display_name: record.display_name.clone(),
            numeric_score: score.numeric_score,
            key_aspects,
            error: score.error,
        });
    }

    Ok(rank(entries))
}

/// Awaits a phase's outstanding tasks. A task that panicked still settles as
/// a per-document failure so siblings and the completeness invariant are
/// untouched.
async fn settle<R>(
    pending: Vec<(DocId, JoinHandle<()>)>,
    results: &DashMap<DocId, R>,
    fallback: impl Fn(DocId, DocumentError) -> R,
) {
    for (id, handle) in pending {
        if let Err(err) = handle.await {
            warn!("pipeline task for document {id} aborted: {err}");
            results.insert(id.clone(), fallback(id, missing_result("task aborted")));
        }
    }
}

fn missing_result(reason: &str) -> DocumentError {
    DocumentError::Oracle(OracleCallError::Unavailable(reason.to_string()))
}
