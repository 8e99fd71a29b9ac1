use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::client::{FileInput, LinkElement, SubmitEvent, TextElement};

/// What the server said, as an exhaustive variant instead of an object with
/// optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Response parsed but carried a truthy `error` field
    ServerError(String),
    /// Extraction result plus the CSV identifier for the download link
    Success { data: Value, csv: String },
}

impl UploadOutcome {
    /// Interpret a parsed response body. The `error` field is only
    /// presence-checked (any truthy value counts); a success must carry a
    /// string `csv`, while `data` is taken as-is and may be absent.
    pub fn from_value(value: Value) -> Result<Self, String> {
        if let Some(error) = value.get("error") {
            if is_truthy(error) {
                let message = error
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                return Ok(UploadOutcome::ServerError(message));
            }
        }

        let csv = value
            .get("csv")
            .and_then(Value::as_str)
            .ok_or_else(|| "response has no csv field".to_string())?
            .to_string();
        let data = value.get("data").cloned().unwrap_or(Value::Null);

        Ok(UploadOutcome::Success { data, csv })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reacts to form submission: posts the selected file as multipart field
/// `file` and renders the outcome into the results and download elements.
pub struct UploadHandler {
    client: reqwest::Client,
    base_url: String,
    input: Arc<dyn FileInput>,
    results: Arc<dyn TextElement>,
    download: Arc<dyn LinkElement>,
}

impl UploadHandler {
    /// `base_url` is the server origin, without a trailing slash.
    pub fn new(
        base_url: impl Into<String>,
        input: Arc<dyn FileInput>,
        results: Arc<dyn TextElement>,
        download: Arc<dyn LinkElement>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            input,
            results,
            download,
        }
    }

    /// Submit-event handler.
    ///
    /// Default navigation is suppressed unconditionally. With no file
    /// selected nothing else happens, not even a request. No timeout, no
    /// retry, no cancellation: a second submission while one is in flight
    /// leaves both running, and whichever response lands last overwrites
    /// the results element. Prior results are not cleared first. Both
    /// behaviors are inherited from the page this replaces.
    pub async fn submit(&self, event: &mut SubmitEvent) {
        event.prevent_default();

        let Some(path) = self.input.selected() else {
            return;
        };

        match self.send(&path).await {
            Ok(UploadOutcome::ServerError(message)) => {
                // Verbatim, and the download link stays as it was
                self.results.set_text(&message);
            }
            Ok(UploadOutcome::Success { data, csv }) => {
                let pretty =
                    serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
                self.results.set_text(&pretty);
                self.download
                    .set_href(&format!("{}/download/{}", self.base_url, csv));
            }
            Err(failure) => {
                self.results.set_text(&format!("Error: {}", failure));
            }
        }
    }

    /// One POST, one JSON parse. Transport and parse failures collapse into
    /// the same stringly error the caller prefixes with `Error: `.
    async fn send(&self, path: &Path) -> Result<UploadOutcome, String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let value: Value = response.json().await.map_err(|e| e.to_string())?;
        UploadOutcome::from_value(value)
    }
}
