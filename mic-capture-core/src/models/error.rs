use thiserror::Error;

/// Errors that can occur during a capture session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user declined microphone access. User-actionable, never retried
    /// automatically.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// No usable audio input device is present.
    #[error("no usable audio input device")]
    DeviceUnavailable,

    /// The recording capability itself is unsupported in this environment.
    #[error("audio capture is not supported in this environment")]
    Unsupported,

    /// The streaming recorder could not be constructed even though a stream
    /// was obtained. The stream is released before this surfaces.
    #[error("recorder setup failed: {0}")]
    RecorderSetup(String),

    /// Chunk assembly into a final artifact failed. Does not block resource
    /// release; the stop resolves with no artifact.
    #[error("finalize failed: {0}")]
    Finalize(String),

    /// The recorder's stop call itself failed. Tracks are still
    /// force-stopped and the machine still resets to idle.
    #[error("recorder stop failed: {0}")]
    Stop(String),

    #[error("invalid session state: {0}")]
    InvalidState(String),

    #[error("configuration failed: {0}")]
    Configuration(String),

    #[error("audio graph error: {0}")]
    AudioGraph(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),
}

impl CaptureError {
    /// Stable machine-readable code, used in lifecycle event payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::DeviceUnavailable => "device_unavailable",
            Self::Unsupported => "unsupported",
            Self::RecorderSetup(_) => "recorder_setup_failure",
            Self::Finalize(_) => "finalize_failure",
            Self::Stop(_) => "stop_failure",
            Self::InvalidState(_) => "invalid_state",
            Self::Configuration(_) => "configuration_failed",
            Self::AudioGraph(_) => "audio_graph_error",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Typed failure from the media-device capability, mirroring the DOMException
/// names `getUserMedia` can reject with.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MediaAccessError {
    #[error("the user denied microphone access")]
    NotAllowed,

    #[error("no audio input device was found")]
    NotFound,

    #[error("audio capture is not supported")]
    NotSupported,
}

impl From<MediaAccessError> for CaptureError {
    fn from(err: MediaAccessError) -> Self {
        match err {
            MediaAccessError::NotAllowed => CaptureError::PermissionDenied,
            MediaAccessError::NotFound => CaptureError::DeviceUnavailable,
            MediaAccessError::NotSupported => CaptureError::Unsupported,
        }
    }
}
