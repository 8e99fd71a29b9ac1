use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::path::Path;

use crate::domain::{AppError, PointRecord};
use crate::infrastructure::AppState;
use crate::modules::{extract, preprocess};
use crate::utils::{has_allowed_extension, sanitize_filename};

/// `POST /upload`: multipart field `file` in, `{"data": [...], "csv": "..."}`
/// out. All rejections are `{"error": "..."}` with a 400, mirroring what the
/// upload page expects to display verbatim.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // Oversized or truncated bodies land here; keep their message
            // apart from the plain no-file case
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(str::to_string).unwrap_or_default();
        if filename.is_empty() {
            return error_response(StatusCode::BAD_REQUEST, "No selected file");
        }
        if !has_allowed_extension(&filename) {
            return error_response(StatusCode::BAD_REQUEST, "File type not allowed");
        }
        let Some(safe_name) = sanitize_filename(&filename) else {
            return error_response(StatusCode::BAD_REQUEST, "File type not allowed");
        };

        let data = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        if let Err(e) = tokio::fs::create_dir_all(&state.config.upload_dir).await {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to create upload dir: {}", e),
            );
        }
        let file_path = state.config.upload_dir.join(&safe_name);
        if let Err(e) = tokio::fs::write(&file_path, &data).await {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to save image: {}", e),
            );
        }

        tracing::info!(%safe_name, bytes = data.len(), "processing upload");

        return match run_extraction(&state, &file_path).await {
            Ok((records, csv_name)) => {
                (StatusCode::OK, Json(json!({ "data": records, "csv": csv_name })))
                    .into_response()
            }
            Err(AppError::Validation(msg)) => error_response(StatusCode::BAD_REQUEST, &msg),
            Err(e) => {
                tracing::error!("extraction failed: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            }
        };
    }

    error_response(StatusCode::BAD_REQUEST, "No file part")
}

/// Preprocess, OCR, parse, and write the CSV. Returns the records and the
/// CSV's bare filename (the client builds `/download/<csv>` from it).
async fn run_extraction(
    state: &AppState,
    image_path: &Path,
) -> Result<(Vec<PointRecord>, String), AppError> {
    let temp = preprocess::preprocess_to_temp(image_path, state.config.preprocess)?;

    let ocr_input = temp.as_deref().unwrap_or(image_path);
    let lines = state.engine.extract_lines(ocr_input).await;

    if let Some(temp) = &temp {
        let _ = tokio::fs::remove_file(temp).await;
    }

    let records = extract::extract_records(&lines?, &state.name_table);
    if records.is_empty() {
        return Err(AppError::Validation(
            "No data extracted from image".to_string(),
        ));
    }

    let csv_name = format!(
        "results_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S%3f")
    );
    let csv_path = state.config.upload_dir.join(&csv_name);
    let mut writer = csv::Writer::from_path(&csv_path)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(AppError::from)?;

    tracing::info!(count = records.len(), %csv_name, "wrote extraction CSV");
    Ok((records, csv_name))
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(json!({ "error": message }))).into_response()
}
