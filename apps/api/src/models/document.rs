use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BatchRow {
    pub id: Uuid,
    pub job_description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub doc_id: String,
    pub batch_id: Uuid,
    pub display_name: String,
    pub content_text: String,
    pub key_aspects: Option<String>,
    pub score: i32,
    pub rank: i32,
    pub error: Option<String>,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
}

/// One scorecard line as read back for reporting. Ordered by `rank`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScorecardRow {
    pub rank: i32,
    pub display_name: String,
    pub score: i32,
    pub error: Option<String>,
}
