pub mod files;

pub use files::{has_allowed_extension, mime_for_extension, sanitize_filename};
