use std::sync::Arc;

use crate::models::config::AudioConstraints;
use crate::models::error::MediaAccessError;

/// Lifecycle status of a media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Live,
    Ended,
}

/// One hardware-backed audio track within a stream.
///
/// `stop` is a request: the track acknowledges by moving to `Ended`, which
/// the reaper polls with a bounded deadline rather than trusting the
/// platform to call back.
pub trait MediaTrack: Send + Sync {
    fn stop(&self);

    fn ready_state(&self) -> TrackState;
}

/// A live audio stream obtained from the permission request.
///
/// Exclusively owned by the active session; all teardown goes through the
/// reaper so every handle is released through one known set of references.
pub trait MediaStream: Send + Sync {
    fn audio_tracks(&self) -> Vec<Arc<dyn MediaTrack>>;
}

impl std::fmt::Debug for dyn MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MediaStream")
    }
}

/// Permission + device capability: returns a live audio stream or a typed
/// failure. Equivalent to `navigator.mediaDevices.getUserMedia`.
pub trait MediaDevices: Send + Sync {
    fn get_user_media(
        &self,
        constraints: &AudioConstraints,
    ) -> Result<Arc<dyn MediaStream>, MediaAccessError>;
}
