use serde::Serialize;

use super::error::CaptureError;

/// Lifecycle event payloads.
///
/// These are the seam the rest of the application (UI, transcription
/// pipeline) hooks into without depending on internal types: minimal,
/// serializable, snake_case on the wire.

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordingStartedEvent {
    pub mime_type: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordingStoppedEvent {
    pub mime_type: String,
    pub byte_size: usize,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RecordingErrorEvent {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PermissionDeniedEvent {
    pub timestamp: String,
}

impl RecordingStartedEvent {
    pub fn new(mime_type: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            timestamp: now_rfc3339(),
        }
    }
}

impl RecordingStoppedEvent {
    pub fn new(mime_type: &str, byte_size: usize) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            byte_size,
            timestamp: now_rfc3339(),
        }
    }
}

impl RecordingErrorEvent {
    pub fn new(error: &CaptureError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            timestamp: now_rfc3339(),
        }
    }
}

impl PermissionDeniedEvent {
    pub fn new() -> Self {
        Self {
            timestamp: now_rfc3339(),
        }
    }
}

impl Default for PermissionDeniedEvent {
    fn default() -> Self {
        Self::new()
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
