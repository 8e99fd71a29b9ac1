pub mod download;
pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::infrastructure::AppState;

/// Phone photos of a ledger easily run past axum's default 2 MB body cap.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // OCR upload
        .route("/upload", post(upload::upload_file))
        // CSV download
        .route("/download/:filename", get(download::download_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
