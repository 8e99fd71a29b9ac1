use serde::{Deserialize, Serialize};

/// One extracted ledger row: the date the points were granted, the point
/// amount, and the holder's name in both romanized and Japanese form.
///
/// `pt` stays a string because OCR output keeps leading zeros and the CSV
/// column is written verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    pub date: String,
    pub pt: String,
    pub name: String,
    pub namae: String,
}
