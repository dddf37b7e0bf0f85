use std::sync::Arc;

use crate::models::config::AudioConstraints;
use crate::models::error::CaptureError;
use crate::traits::audio_graph::AudioContext;
use crate::traits::media::MediaStream;
use crate::traits::recorder::MimeSupport;

/// Detected target platform.
///
/// iOS is the only platform with behavior different enough to warrant its
/// own strategy: a narrower codec set and suspend-before-close teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Standard,
}

/// Strategy object encapsulating iOS-vs-other behavioral differences.
///
/// One implementation per platform, selected once at construction, so the
/// controller and reaper never branch on platform directly.
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Negotiate microphone permission and return a live stream, or a typed
    /// error (`PermissionDenied` / `DeviceUnavailable` / `Unsupported`)
    /// rather than a raw platform exception.
    fn request_permission(
        &self,
        constraints: &AudioConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureError>;

    /// Try the platform's ordered candidate list and return the first
    /// supported container type. Returns `""` ("let the recorder choose")
    /// when none of the preferred types are supported.
    fn select_mime_type(&self, support: &dyn MimeSupport) -> String;

    fn create_audio_context(&self) -> Result<Arc<dyn AudioContext>, CaptureError>;

    /// Release the audio context with platform-specific timing. On iOS this
    /// suspends, waits briefly, then closes; elsewhere it closes directly.
    fn teardown_context(&self, context: &dyn AudioContext) -> Result<(), CaptureError>;
}
