//! Persistence collaborator — writes a finished batch to PostgreSQL and the
//! raw uploads to S3, everything keyed by the document identifier.

use std::collections::HashMap;

use anyhow::Result;
use aws_sdk_s3::primitives::ByteStream;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extract::DocumentRecord;
use crate::intake::identifier::DocId;
use crate::models::document::{BatchRow, DocumentRow, ScorecardRow};
use crate::pipeline::BatchOutcome;

/// Persists one scored batch: the batch row, one document row per entry in
/// final rank order, and each document's raw bytes as an S3 object.
pub async fn persist_batch(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    batch_id: Uuid,
    job_description: &str,
    records: &[DocumentRecord],
    outcome: &BatchOutcome,
) -> Result<()> {
    sqlx::query("INSERT INTO batches (id, job_description, status) VALUES ($1, $2, $3)")
        .bind(batch_id)
        .bind(job_description)
        .bind("scored")
        .execute(pool)
        .await?;

    let by_id: HashMap<&DocId, &DocumentRecord> =
        records.iter().map(|record| (&record.id, record)).collect();

    for (position, entry) in outcome.entries.iter().enumerate() {
        let Some(record) = by_id.get(&entry.document_id) else {
            warn!("no record for scored entry {} — skipping", entry.document_id);
            continue;
        };

        let s3_key = format!("documents/{}/{}", entry.document_id, record.display_name);
        s3.put_object()
            .bucket(s3_bucket)
            .key(&s3_key)
            .body(ByteStream::from(record.raw_bytes.to_vec()))
            .content_type("application/octet-stream")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        sqlx::query(
            r#"
            INSERT INTO documents
                (doc_id, batch_id, display_name, content_text, key_aspects,
                 score, rank, error, s3_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.document_id.as_str())
        .bind(batch_id)
        .bind(&entry.display_name)
        .bind(&record.text)
        .bind(entry.key_aspects.as_deref())
        .bind(entry.numeric_score as i32)
        .bind((position + 1) as i32)
        .bind(entry.error.as_ref().map(|e| e.to_string()))
        .bind(&s3_key)
        .execute(pool)
        .await?;
    }

    info!(
        "persisted batch {batch_id}: {} document(s)",
        outcome.entries.len()
    );
    Ok(())
}

pub async fn get_batch(pool: &PgPool, batch_id: Uuid) -> Result<Option<BatchRow>, sqlx::Error> {
    sqlx::query_as::<_, BatchRow>("SELECT * FROM batches WHERE id = $1")
        .bind(batch_id)
        .fetch_optional(pool)
        .await
}

/// Returns a stored batch's scorecard in final rank order.
pub async fn load_scorecard(
    pool: &PgPool,
    batch_id: Uuid,
) -> Result<Vec<ScorecardRow>, sqlx::Error> {
    sqlx::query_as::<_, ScorecardRow>(
        r#"
        SELECT rank, display_name, score, error
        FROM documents
        WHERE batch_id = $1
        ORDER BY rank ASC
        "#,
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await
}

pub async fn get_document(
    pool: &PgPool,
    doc_id: &str,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE doc_id = $1")
        .bind(doc_id)
        .fetch_optional(pool)
        .await
}

/// Fetches one stored document's original bytes from S3.
pub async fn download_blob(
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    s3_key: &str,
) -> Result<Vec<u8>> {
    let object = s3
        .get_object()
        .bucket(s3_bucket)
        .key(s3_key)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 download failed: {e}"))?;

    let data = object
        .body
        .collect()
        .await
        .map_err(|e| anyhow::anyhow!("S3 body read failed: {e}"))?;

    Ok(data.into_bytes().to_vec())
}
