use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{stage_uploads, Upload};
use crate::errors::AppError;
use crate::extract::normalize::normalize;
use crate::pipeline::{score_batch, BatchOutcome};
use crate::state::AppState;
use crate::storage;

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub batch_id: Uuid,
    pub results: Vec<ScoredDocument>,
}

/// One scorecard line, best score first. Failed documents show score 0 with
/// the reason attached.
#[derive(Debug, Serialize)]
pub struct ScoredDocument {
    pub document_id: String,
    pub display_name: String,
    pub score: u32,
    pub error: Option<String>,
}

/// POST /api/v1/batches
/// Multipart: one `job_description` text field plus any number of `files`
/// parts (single documents or zip archives of documents).
pub async fn handle_submit_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, AppError> {
    let mut job_description: Option<String> = None;
    let mut uploads: Vec<Upload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable job_description: {e}")))?;
                job_description = Some(text);
            }
            Some("files") => {
                let display_name = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("could not read '{display_name}': {e}"))
                })?;
                uploads.push(Upload {
                    display_name,
                    content_type,
                    bytes,
                });
            }
            _ => {} // unknown fields ignored
        }
    }

    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description field is required".to_string()))?;
    if uploads.is_empty() {
        return Err(AppError::Validation(
            "at least one file is required".to_string(),
        ));
    }

    let batch_id = Uuid::new_v4();
    info!("batch {batch_id}: {} upload(s) received", uploads.len());

    // Expand archives, assign identifiers in arrival order, normalize.
    let staged = stage_uploads(uploads);
    let mut records = Vec::with_capacity(staged.len());
    for file in staged {
        let id = state.ids.next_id();
        records.push(normalize(id, file, &state.extractors).await);
    }
    info!("batch {batch_id}: {} document(s) normalized", records.len());

    let outcome = score_batch(&state.gateway, &job_description, &records).await?;

    storage::persist_batch(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        batch_id,
        &job_description,
        &records,
        &outcome,
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Json(batch_response(batch_id, &outcome)))
}

fn batch_response(batch_id: Uuid, outcome: &BatchOutcome) -> BatchResponse {
    BatchResponse {
        batch_id,
        results: outcome
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document_id: entry.document_id.to_string(),
                display_name: entry.display_name.clone(),
                score: entry.numeric_score,
                error: entry.error.as_ref().map(|e| e.to_string()),
            })
            .collect(),
    }
}
