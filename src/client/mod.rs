//! The upload page's interaction logic, as a library.
//!
//! Two independent handlers hang off the page: one previews the selected
//! image, one submits it for extraction and renders the response. They share
//! nothing but the file input they both read from. Page elements come in as
//! trait objects so tests run against fakes instead of a browser.

pub mod preview;
pub mod upload;

pub use preview::PreviewHandler;
pub use upload::{UploadHandler, UploadOutcome};

use std::path::PathBuf;

/// The file input element. At most one file is selected at a time; handlers
/// read it on demand rather than holding a copy.
pub trait FileInput: Send + Sync {
    fn selected(&self) -> Option<PathBuf>;
}

/// A text-bearing element (the results panel).
pub trait TextElement: Send + Sync {
    fn set_text(&self, text: &str);
}

/// An image element (the preview).
pub trait ImageElement: Send + Sync {
    fn set_source(&self, url: &str);
}

/// An anchor element (the CSV download link).
pub trait LinkElement: Send + Sync {
    fn set_href(&self, href: &str);
}

/// A form submission. The handler suppresses default navigation
/// unconditionally, before it even looks at the file input.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
