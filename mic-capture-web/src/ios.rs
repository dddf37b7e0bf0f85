use std::sync::Arc;
use std::time::Duration;

use mic_capture_core::{
    AudioConstraints, AudioContext, AudioGraph, CaptureError, MediaDevices, MediaStream,
    MimeSupport, Platform, PlatformAdapter,
};

use crate::mime::{negotiate, IOS_MIME_CANDIDATES};

/// iOS strategy: narrow MP4/AAC codec set and suspend-before-close context
/// teardown.
pub struct IosPlatform {
    devices: Arc<dyn MediaDevices>,
    graph: Arc<dyn AudioGraph>,
    suspend_close_delay: Duration,
}

impl IosPlatform {
    pub fn new(
        devices: Arc<dyn MediaDevices>,
        graph: Arc<dyn AudioGraph>,
        suspend_close_delay: Duration,
    ) -> Self {
        Self {
            devices,
            graph,
            suspend_close_delay,
        }
    }
}

impl PlatformAdapter for IosPlatform {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn request_permission(
        &self,
        constraints: &AudioConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureError> {
        self.devices
            .get_user_media(constraints)
            .map_err(CaptureError::from)
    }

    fn select_mime_type(&self, support: &dyn MimeSupport) -> String {
        negotiate(IOS_MIME_CANDIDATES, support)
    }

    fn create_audio_context(&self) -> Result<Arc<dyn AudioContext>, CaptureError> {
        self.graph.create_context()
    }

    /// Closing an iOS audio context immediately after recording silently
    /// fails and leaves the microphone indicator lit. Suspend, give the
    /// system time to settle, then close.
    fn teardown_context(&self, context: &dyn AudioContext) -> Result<(), CaptureError> {
        if let Err(e) = context.suspend() {
            log::warn!("audio context suspend failed: {e}");
        }
        std::thread::sleep(self.suspend_close_delay);
        context.close()
    }
}
