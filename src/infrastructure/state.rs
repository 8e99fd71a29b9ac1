//! Application state shared across all handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::modules::extract::NameTable;
use crate::modules::ocr::{OcrEngine, TesseractEngine};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// OCR engine behind a trait so tests can inject a canned one
    pub engine: Arc<dyn OcrEngine>,
    pub name_table: Arc<NameTable>,
}

impl AppState {
    /// Wire up the production state: tesseract CLI engine, name table from
    /// the configured path (an unloadable table degrades to pass-through).
    pub fn new(config: Config) -> Self {
        let engine = TesseractEngine::new(
            config.tesseract_cmd.clone(),
            config.ocr_language.clone(),
            config.ocr_psm,
        );

        let name_table = match NameTable::load(&config.name_table_path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Failed to load name table: {} (names pass through)", e);
                NameTable::empty()
            }
        };
        if name_table.is_empty() {
            tracing::info!("Name table is empty, OCR'd names pass through unmapped");
        }

        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            name_table: Arc::new(name_table),
        }
    }

    /// State with a caller-supplied engine and table, for tests.
    pub fn with_engine(config: Config, engine: Arc<dyn OcrEngine>, name_table: NameTable) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            name_table: Arc::new(name_table),
        }
    }
}
