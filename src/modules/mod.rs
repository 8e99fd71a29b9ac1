//! Processing modules: everything between "bytes arrived" and "records out".

pub mod evaluation;
pub mod extract;
pub mod ocr;
pub mod preprocess;
