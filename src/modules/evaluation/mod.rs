//! Accuracy scoring of OCR output against known-good transcriptions.
//!
//! Used when tuning the preprocess method or tesseract settings against a
//! reference image: score the extracted lines against the expected lines
//! and compare runs.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::AppError;

#[derive(Debug, Deserialize)]
struct ExpectedFile {
    expected_texts: Vec<String>,
}

/// Load the reference transcription (`{"expected_texts": [...]}`).
pub fn load_expected(path: &Path) -> Result<Vec<String>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Failed to read expected data {:?}: {}", path, e)))?;
    let file: ExpectedFile = serde_json::from_str(&content)
        .map_err(|e| AppError::Validation(format!("Invalid expected data {:?}: {}", path, e)))?;
    Ok(file.expected_texts)
}

/// Share of expected lines that appear verbatim in the extraction, as a
/// percentage.
pub fn compare(extracted: &[String], expected: &[String]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let matched = expected
        .iter()
        .filter(|line| extracted.contains(line))
        .count();
    matched as f64 / expected.len() as f64 * 100.0
}

/// Like [`compare`], but after normalization, and counting a hit when either
/// line contains the other. Forgives date-format drift and split lines.
pub fn compare_normalized(extracted: &[String], expected: &[String]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }

    let extracted: Vec<String> = extracted.iter().map(|l| normalize_line(l)).collect();
    let matched = expected
        .iter()
        .map(|l| normalize_line(l))
        .filter(|exp| {
            extracted
                .iter()
                .any(|ext| exp.contains(ext.as_str()) || ext.contains(exp.as_str()))
        })
        .count();

    matched as f64 / expected.len() as f64 * 100.0
}

/// Fold `年`/`月` to `/`, drop `日`, collapse whitespace.
fn normalize_line(line: &str) -> String {
    let folded = line.replace(['年', '月'], "/").replace('日', "");
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_compare_counts_verbatim_hits() {
        let extracted = lines(&["500pt たなか", "noise"]);
        let expected = lines(&["500pt たなか", "200pt すずき"]);
        assert_eq!(compare(&extracted, &expected), 50.0);
    }

    #[test]
    fn normalized_compare_folds_date_notation() {
        let extracted = lines(&["2024/3/15"]);
        let expected = lines(&["2024年3月15日"]);
        assert_eq!(compare(&extracted, &expected), 0.0);
        assert_eq!(compare_normalized(&extracted, &expected), 100.0);
    }

    #[test]
    fn empty_expected_scores_zero() {
        assert_eq!(compare(&lines(&["a"]), &[]), 0.0);
        assert_eq!(compare_normalized(&lines(&["a"]), &[]), 0.0);
    }
}
