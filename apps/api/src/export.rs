//! Export/report surface — the ranked scorecard as JSON or CSV, plus
//! retrieval of a stored document's original upload. Everything served here
//! is already in final rank order; nothing re-sorts.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::ScorecardRow;
use crate::state::AppState;
use crate::storage;

#[derive(Debug, Serialize)]
pub struct BatchDetailResponse {
    pub batch_id: Uuid,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub results: Vec<ScorecardRow>,
}

/// GET /api/v1/batches/:id
pub async fn handle_get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BatchDetailResponse>, AppError> {
    let batch = storage::get_batch(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Batch {id} not found")))?;
    let results = storage::load_scorecard(&state.db, id).await?;

    Ok(Json(BatchDetailResponse {
        batch_id: batch.id,
        status: batch.status,
        created_at: batch.created_at,
        results,
    }))
}

/// GET /api/v1/batches/:id/scorecard.csv
pub async fn handle_get_scorecard_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if storage::get_batch(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("Batch {id} not found")));
    }
    let rows = storage::load_scorecard(&state.db, id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"scorecard-{id}.csv\""),
            ),
        ],
        render_scorecard_csv(&rows),
    ))
}

/// GET /api/v1/documents/:id/download
pub async fn handle_download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = storage::get_document(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    let bytes = storage::download_blob(&state.s3, &state.config.s3_bucket, &document.s3_key)
        .await
        .map_err(|e| AppError::S3(e.to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.display_name),
            ),
        ],
        bytes,
    ))
}

/// Renders a scorecard as CSV, preserving the stored rank order.
pub fn render_scorecard_csv(rows: &[ScorecardRow]) -> String {
    let mut csv = String::from("rank,document,score,error\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            row.rank,
            escape_csv(&row.display_name),
            row.score,
            escape_csv(row.error.as_deref().unwrap_or("")),
        ));
    }
    csv
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
