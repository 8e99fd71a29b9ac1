//! Name normalization and the romanization table.
//!
//! OCR mangles handwritten names badly: stray symbols, emoji the members
//! draw next to their names, full-width/half-width drift. Normalization
//! strips all of that, then the table maps the cleaned Japanese name to its
//! romanized form, falling back to fuzzy matching for near-misses.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::domain::AppError;

/// Keep word characters, kana, kanji, the iteration/long-vowel marks and
/// whitespace; drop everything else (emoji, box-drawing, punctuation).
static SYMBOL_STRIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\p{Hiragana}\p{Katakana}\p{Han}々ー～\s]+").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Fragments tesseract reliably misreads into name cells on these ledgers.
static ERROR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["^[lIi|]+\\s", "[|｜]+", "〆+"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Clean a raw OCR'd name: NFKC width folding, symbol stripping, misread
/// removal, whitespace collapsing.
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw.nfkc().collect();
    let cleaned = SYMBOL_STRIP.replace_all(&folded, "");
    let cleaned = ERROR_PATTERNS
        .iter()
        .fold(cleaned.into_owned(), |acc, pattern| {
            pattern.replace_all(&acc, "").into_owned()
        });
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameEntry {
    pub english: String,
    pub japanese: String,
}

#[derive(Debug, Deserialize)]
struct NameTableFile {
    default: Option<NameEntry>,
    name_table: Vec<NameEntry>,
}

/// Japanese-to-romanized name mapping with fuzzy fallback.
pub struct NameTable {
    by_japanese: HashMap<String, String>,
    default_entry: NameEntry,
}

/// Minimum Jaro-Winkler similarity before a fuzzy hit replaces the OCR'd name.
const FUZZY_CUTOFF: f64 = 0.60;

impl NameTable {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read name table {:?}: {}", path, e)))?;
        let file: NameTableFile = serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Invalid name table {:?}: {}", path, e)))?;

        let mut table = Self::from_entries(file.name_table);
        if let Some(default) = file.default {
            table.default_entry = default;
        }
        Ok(table)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = NameEntry>) -> Self {
        Self {
            by_japanese: entries
                .into_iter()
                .map(|e| (e.japanese, e.english))
                .collect(),
            default_entry: NameEntry {
                english: "Unknown".to_string(),
                japanese: "不明".to_string(),
            },
        }
    }

    pub fn empty() -> Self {
        Self::from_entries(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.by_japanese.is_empty()
    }

    /// Resolve a raw OCR'd name to `(romanized, japanese)`.
    ///
    /// Exact match on the normalized name wins; otherwise the closest table
    /// entry above [`FUZZY_CUTOFF`] is used; otherwise the raw name passes
    /// through unchanged so nothing silently disappears from the output.
    pub fn resolve(&self, raw: &str) -> (String, String) {
        let normalized = normalize_name(raw);

        if normalized.is_empty() {
            return (
                self.default_entry.english.clone(),
                self.default_entry.japanese.clone(),
            );
        }

        if let Some(english) = self.by_japanese.get(&normalized) {
            return (english.clone(), normalized);
        }

        let best = self
            .by_japanese
            .iter()
            .map(|(japanese, english)| {
                (strsim::jaro_winkler(&normalized, japanese), japanese, english)
            })
            .filter(|(score, _, _)| *score >= FUZZY_CUTOFF)
            .max_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((score, japanese, english)) = best {
            tracing::debug!(%raw, %japanese, score, "fuzzy name match");
            return (english.clone(), japanese.clone());
        }

        (raw.to_string(), raw.to_string())
    }
}
