pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export;
use crate::intake::handlers;
use crate::state::AppState;

/// Uploads are whole candidate batches (possibly zipped), so the default 2MB
/// body cap is far too small.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/batches", post(handlers::handle_submit_batch))
        .route("/api/v1/batches/:id", get(export::handle_get_batch))
        .route(
            "/api/v1/batches/:id/scorecard.csv",
            get(export::handle_get_scorecard_csv),
        )
        .route(
            "/api/v1/documents/:id/download",
            get(export::handle_download_document),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
