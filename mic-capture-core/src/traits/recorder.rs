use std::sync::Arc;
use std::time::Duration;

use crate::models::error::CaptureError;
use crate::traits::media::MediaStream;

/// Callback invoked whenever the recorder delivers an encoded chunk.
///
/// Chunks arrive in temporal order; the session appends them in delivery
/// order and concatenates in that same order on finalize.
pub type ChunkCallback = Arc<dyn Fn(&[u8]) + Send + Sync + 'static>;

/// Callback invoked once when the recorder has flushed its final chunk
/// after a stop request.
pub type FinalizeCallback = Box<dyn FnOnce() + Send + 'static>;

/// Streaming recorder capability. Equivalent to a `MediaRecorder`.
pub trait StreamingRecorder: Send + Sync {
    /// Start recording, flushing an encoded chunk every `chunk_interval`.
    fn start(
        &self,
        chunk_interval: Duration,
        on_chunk: ChunkCallback,
    ) -> Result<(), CaptureError>;

    /// Request finalization. `on_finalize` fires after the last chunk has
    /// been delivered; callers wait for it with a bounded timeout.
    fn request_stop(&self, on_finalize: FinalizeCallback) -> Result<(), CaptureError>;

    /// The mime type the recorder actually negotiated. May differ from the
    /// requested type when the request was empty ("let the recorder choose").
    fn mime_type(&self) -> String;

    fn is_active(&self) -> bool;
}

/// Queryable container-format support, used for mime-type negotiation.
pub trait MimeSupport: Send + Sync {
    fn is_type_supported(&self, mime_type: &str) -> bool;
}

/// Constructs streaming recorders over a live stream.
pub trait RecorderFactory: MimeSupport {
    /// Build a recorder for `stream`. An empty `mime_type` means the
    /// recorder chooses its own container.
    fn create(
        &self,
        stream: &Arc<dyn MediaStream>,
        mime_type: &str,
    ) -> Result<Arc<dyn StreamingRecorder>, CaptureError>;
}
