use std::sync::Arc;

use mic_capture_core::{
    AudioConstraints, AudioContext, AudioGraph, CaptureError, MediaDevices, MediaStream,
    MimeSupport, Platform, PlatformAdapter,
};

use crate::mime::{negotiate, STANDARD_MIME_CANDIDATES};

/// Default strategy for everything that is not iOS: opus/webm preferred,
/// direct context close.
pub struct StandardPlatform {
    devices: Arc<dyn MediaDevices>,
    graph: Arc<dyn AudioGraph>,
}

impl StandardPlatform {
    pub fn new(devices: Arc<dyn MediaDevices>, graph: Arc<dyn AudioGraph>) -> Self {
        Self { devices, graph }
    }
}

impl PlatformAdapter for StandardPlatform {
    fn platform(&self) -> Platform {
        Platform::Standard
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
        negotiate(STANDARD_MIME_CANDIDATES, support)
    }

    fn create_audio_context(&self) -> Result<Arc<dyn AudioContext>, CaptureError> {
        self.graph.create_context()
    }

    fn teardown_context(&self, context: &dyn AudioContext) -> Result<(), CaptureError> {
        context.close()
    }
}
