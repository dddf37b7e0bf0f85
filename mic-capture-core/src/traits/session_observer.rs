use crate::models::events::{
    PermissionDeniedEvent, RecordingErrorEvent, RecordingStartedEvent, RecordingStoppedEvent,
};

/// Observer for named lifecycle events.
///
/// This is the seam the rest of the application hooks into without
/// depending on internal types. All methods default to no-ops so observers
/// implement only the events they care about. Called from whichever thread
/// drove the transition; implementations marshal to the UI thread if needed.
pub trait SessionObserver: Send + Sync {
    fn on_recording_started(&self, _event: &RecordingStartedEvent) {}

    fn on_recording_stopped(&self, _event: &RecordingStoppedEvent) {}

    fn on_recording_error(&self, _event: &RecordingErrorEvent) {}

    fn on_permission_denied(&self, _event: &PermissionDeniedEvent) {}
}
