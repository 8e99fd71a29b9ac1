use std::path::Path;

/// Image types the upload endpoint accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce an uploaded filename to a safe basename: strip any directory
/// components and keep only word characters, dashes and dots. Returns `None`
/// when nothing safe is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let base = Path::new(filename).file_name()?.to_str()?;
    let safe: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let trimmed = safe.trim_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// MIME type for a preview data URL, from the file extension.
pub fn mime_for_extension(filename: &str) -> &'static str {
    match filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
