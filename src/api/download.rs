use axum::{
    extract::{Path as AxumPath, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::infrastructure::AppState;
use crate::utils::sanitize_filename;

/// `GET /download/:filename`: serve a file out of the upload directory as an
/// attachment. Only sanitized basenames are accepted, so the route cannot
/// reach outside the upload directory.
pub async fn download_file(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> impl IntoResponse {
    let safe_name = match sanitize_filename(&filename) {
        Some(name) if name == filename => name,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid filename" })),
            )
                .into_response();
        }
    };

    let path = state.config.upload_dir.join(&safe_name);
    let contents = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(%safe_name, "download of missing file: {}", e);
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "File not found" })),
            )
                .into_response();
        }
    };

    let content_type = if safe_name.ends_with(".csv") {
        "text/csv; charset=utf-8"
    } else {
        "application/octet-stream"
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", safe_name)
            .parse()
            .unwrap(),
    );

    (StatusCode::OK, headers, contents).into_response()
}
