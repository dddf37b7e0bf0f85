use chrono::{DateTime, Utc};

use super::error::CaptureError;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → initializing → requesting_permissions → ready → recording
///                                  ↓                        ↓
///                           permission_denied            stopping → idle
///
/// any non-idle state → cleaning → idle   (reaper safety valve)
/// failures at any step → error → cleaning → idle
/// ```
///
/// The machine is cyclic by design: one recording session per
/// `idle → ... → idle` cycle, no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Initializing,
    RequestingPermissions,
    PermissionDenied,
    Ready,
    Recording,
    Stopping,
    Cleaning,
    Error,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    /// Whether a new session may begin from this state.
    ///
    /// `PermissionDenied` and `Error` are startable because the controller
    /// routes them through cleanup before acquiring anything new.
    pub fn is_startable(&self) -> bool {
        matches!(self, Self::Idle | Self::PermissionDenied | Self::Error)
    }

    /// Whether a transition from `self` to `next` is in the adjacency.
    ///
    /// `Cleaning` is reachable from every non-idle state: the reaper must be
    /// able to tear down from wherever a failure left the machine.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;

        if next == Cleaning {
            return !self.is_idle();
        }

        matches!(
            (self, next),
            (Idle, Initializing)
                | (Initializing, RequestingPermissions)
                | (Initializing, Error)
                | (RequestingPermissions, Ready)
                | (RequestingPermissions, PermissionDenied)
                | (RequestingPermissions, Error)
                | (Ready, Recording)
                | (Ready, Error)
                | (Recording, Stopping)
                | (Recording, Error)
                | (Stopping, Idle)
                | (Stopping, Error)
                | (Cleaning, Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::RequestingPermissions => "requesting_permissions",
            Self::PermissionDenied => "permission_denied",
            Self::Ready => "ready",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
            Self::Cleaning => "cleaning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted to state listeners on every accepted transition.
///
/// Listeners are side-effect-free observers (logging, store updates, UI).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    pub previous: SessionState,
    pub next: SessionState,
    pub error: Option<CaptureError>,
    pub timestamp: DateTime<Utc>,
}
