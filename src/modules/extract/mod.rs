//! Ledger line parsing.
//!
//! The OCR'd ledger alternates date headers (`2024年3月15日`) with point
//! rows (`500pt たなか`). A date header applies to every point row until the
//! next header. Rows that do not match either shape are skipped.

pub mod names;

pub use names::{normalize_name, NameTable};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::PointRecord;

// Tesseract often reads 日 as 晶 on these photos, so both close a date.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*[日晶]").unwrap());

// Point amount with optional thousands separators, a pt suffix in either
// width, then the holder's name.
static PT_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d,\.]+)\s*[pPｐＰ]?[tTｔＴ]\s+(.*)").unwrap());

/// Parse OCR'd lines into point records, resolving names through `table`.
pub fn extract_records(lines: &[String], table: &NameTable) -> Vec<PointRecord> {
    let mut records = Vec::new();
    let mut current_date: Option<String> = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = DATE_PATTERN.captures(line) {
            current_date = parse_date(&caps);
            if current_date.is_none() {
                tracing::warn!(%line, "invalid date line");
            }
            continue;
        }

        let Some(date) = &current_date else {
            continue;
        };

        let Some(caps) = PT_NAME_PATTERN.captures(line) else {
            tracing::debug!(%line, "skipped line (no point pattern)");
            continue;
        };

        let pt_raw = caps[1].replace([',', '.'], "");
        let Ok(pt) = pt_raw.parse::<i64>() else {
            tracing::debug!(%line, %pt_raw, "point amount did not parse");
            continue;
        };

        let (name, namae) = table.resolve(&caps[2]);
        if name.is_empty() || namae.is_empty() {
            continue;
        }

        records.push(PointRecord {
            date: date.clone(),
            pt: pt.to_string(),
            name,
            namae,
        });
    }

    records
}

fn parse_date(caps: &regex::Captures<'_>) -> Option<String> {
    let year: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{:04}/{:02}/{:02}", year, month, day))
}
