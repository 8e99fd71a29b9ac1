//! OCR engine abstraction.
//!
//! Recognition itself stays outside the process: the shipped implementation
//! shells out to the tesseract CLI. The trait is the seam that lets API
//! tests run against a canned engine.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::AppError;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extract text from the image at `path`, one string per non-empty line.
    async fn extract_lines(&self, path: &Path) -> Result<Vec<String>, AppError>;
}

/// Tesseract CLI wrapper: `tesseract <image> stdout -l <lang> --psm <psm>`.
pub struct TesseractEngine {
    command: String,
    language: String,
    psm: u32,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>, language: impl Into<String>, psm: u32) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
            psm,
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn extract_lines(&self, path: &Path) -> Result<Vec<String>, AppError> {
        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout") // Output to stdout
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .await
            .map_err(|e| AppError::External(format!("Failed to execute tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::External(format!("Tesseract failed: {}", stderr)));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| AppError::External(format!("Invalid UTF-8 output: {}", e)))?;

        Ok(text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }
}
