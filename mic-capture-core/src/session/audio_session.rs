use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::audio_graph::{AnalyserNode, AudioContext};
use crate::traits::media::MediaStream;
use crate::traits::recorder::StreamingRecorder;

/// Shared slot holding the (at most one) active session.
///
/// The controller, visualizer and reaper all reach resources through this
/// one reference, so the reaper can always find and release every handle.
pub type SharedSession = Arc<Mutex<Option<AudioSession>>>;

/// The mutable aggregate owned for the lifetime of one recording.
///
/// Created when `Initializing` begins; resource fields are filled in
/// progressively as they are acquired so a failure at any step leaves a
/// partially built session the reaper can still release. Destroyed (the
/// slot cleared) at the end of `Cleaning`, regardless of whether cleanup
/// was triggered by a normal stop or by an error. Nothing is retained
/// across sessions.
pub struct AudioSession {
    pub id: uuid::Uuid,
    pub stream: Option<Arc<dyn MediaStream>>,
    pub recorder: Option<Arc<dyn StreamingRecorder>>,
    pub context: Option<Arc<dyn AudioContext>>,
    pub analyser: Option<Arc<dyn AnalyserNode>>,

    /// Encoded chunks, append-only during recording, drained exactly once
    /// on finalize. Shared with the recorder's chunk callback.
    pub chunks: Arc<Mutex<Vec<Vec<u8>>>>,

    /// Negotiated container type; empty until negotiation completes.
    pub mime_type: String,
}

impl AudioSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            stream: None,
            recorder: None,
            context: None,
            analyser: None,
            chunks: Arc::new(Mutex::new(Vec::new())),
            mime_type: String::new(),
        }
    }

    /// Take all accumulated chunks, leaving the buffer empty.
    pub fn drain_chunks(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.chunks.lock())
    }
}

impl Default for AudioSession {
    fn default() -> Self {
        Self::new()
    }
}

pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(None))
}
