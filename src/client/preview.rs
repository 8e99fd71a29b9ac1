use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::client::{FileInput, ImageElement};
use crate::utils::mime_for_extension;

/// Reacts to file-selection changes: reads the selected file and shows it
/// as a data URL in the preview element.
pub struct PreviewHandler {
    input: Arc<dyn FileInput>,
    preview: Arc<dyn ImageElement>,
}

impl PreviewHandler {
    pub fn new(input: Arc<dyn FileInput>, preview: Arc<dyn ImageElement>) -> Self {
        Self { input, preview }
    }

    /// Change-event handler.
    ///
    /// No selection is a no-op; the previous preview stays. A file that
    /// cannot be read also leaves the preview untouched. When two reads are
    /// in flight at once, whichever finishes last sets the preview.
    pub async fn file_selected(&self) {
        let Some(path) = self.input.selected() else {
            return;
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("preview read failed for {:?}: {}", path, e);
                return;
            }
        };

        let mime = mime_for_extension(&path.to_string_lossy());
        let url = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));
        self.preview.set_source(&url);
    }
}
