use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::extract::ExtractorSet;
use crate::intake::identifier::IdGenerator;
use crate::oracle::OracleGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Bounded-concurrency oracle access, shared by every batch.
    pub gateway: OracleGateway,
    /// Per-format text extraction collaborators.
    pub extractors: Arc<ExtractorSet>,
    /// Process-wide document id source — monotonic across batches.
    pub ids: Arc<IdGenerator>,
    pub config: Config,
}
