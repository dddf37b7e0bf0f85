//! # mic-capture-core
//!
//! Platform-agnostic microphone capture session core.
//!
//! Provides the session state machine, recording orchestration, live
//! waveform extraction, and idempotent resource teardown. Browser-specific
//! capabilities (media devices, streaming recorder, audio graph, frame
//! scheduler) are injected through traits and plug into the generic
//! `RecordingController`; platform policy (iOS quirks, container
//! negotiation) lives behind the `PlatformAdapter` trait.
//!
//! ## Architecture
//!
//! ```text
//! mic-capture-core (this crate)
//! ├── traits/    ← MediaDevices, StreamingRecorder, AudioGraph, FrameScheduler,
//! │                PlatformAdapter, SessionObserver
//! ├── models/    ← CaptureError, SessionState, SessionConfig, RecordedArtifact,
//! │                lifecycle events
//! └── session/   ← StateMachine, RecordingController, Visualizer, ResourceReaper
//! ```

pub mod models;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use models::artifact::{RecordedArtifact, WaveformFrame};
pub use models::config::{AudioConstraints, SessionConfig};
pub use models::error::{CaptureError, MediaAccessError};
pub use models::events::{
    PermissionDeniedEvent, RecordingErrorEvent, RecordingStartedEvent, RecordingStoppedEvent,
};
pub use models::state::{SessionState, TransitionRecord};
pub use session::controller::RecordingController;
pub use session::machine::{ListenerId, StateMachine, TransitionListener};
pub use session::reaper::ResourceReaper;
pub use session::visualizer::{Visualizer, WaveformListener, WaveformListenerId};
pub use traits::audio_graph::{AnalyserNode, AudioContext, AudioGraph, ContextState};
pub use traits::frame_scheduler::{FrameRequestId, FrameScheduler};
pub use traits::media::{MediaDevices, MediaStream, MediaTrack, TrackState};
pub use traits::platform_adapter::{Platform, PlatformAdapter};
pub use traits::recorder::{
    ChunkCallback, FinalizeCallback, MimeSupport, RecorderFactory, StreamingRecorder,
};
pub use traits::session_observer::SessionObserver;
