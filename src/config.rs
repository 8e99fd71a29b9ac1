use std::env;
use std::path::PathBuf;

use crate::modules::preprocess::PreprocessMethod;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub tesseract_cmd: String,
    pub ocr_language: String,
    pub ocr_psm: u32,
    pub preprocess: PreprocessMethod,
    pub name_table_path: PathBuf,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            tesseract_cmd: env::var("TESSERACT_CMD").unwrap_or_else(|_| "tesseract".to_string()),
            ocr_language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "jpn+jpn_vert".to_string()),
            ocr_psm: env::var("OCR_PSM")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(6),
            preprocess: env::var("PREPROCESS")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(PreprocessMethod::None),
            name_table_path: env::var("NAME_TABLE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config/name_table.json")),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
        }
    }
}
