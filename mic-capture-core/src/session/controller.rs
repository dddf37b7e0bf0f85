use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::artifact::{RecordedArtifact, WaveformFrame};
use crate::models::config::SessionConfig;
use crate::models::error::CaptureError;
use crate::models::events::{
    PermissionDeniedEvent, RecordingErrorEvent, RecordingStartedEvent, RecordingStoppedEvent,
};
use crate::models::state::SessionState;
use crate::session::audio_session::{new_shared_session, AudioSession, SharedSession};
use crate::session::machine::{ListenerId, StateMachine, TransitionListener};
use crate::session::reaper::ResourceReaper;
use crate::session::visualizer::{Visualizer, WaveformListener, WaveformListenerId};
use crate::traits::frame_scheduler::FrameScheduler;
use crate::traits::platform_adapter::PlatformAdapter;
use crate::traits::recorder::{ChunkCallback, MimeSupport, RecorderFactory};
use crate::traits::session_observer::SessionObserver;

/// Orchestrates the capture session lifecycle.
///
/// One controller is constructed per application; the hardware microphone
/// is a single shared resource, and the state machine's transition
/// validation (not per-call locking) is what prevents two sessions from
/// being active at once. All mutable handles live in the one owned
/// [`AudioSession`], so independent controller instances share no state.
///
/// Every failure funnels through one handling point that logs, emits a
/// lifecycle event, and runs reaper cleanup before the error (or a `None`
/// artifact) reaches the caller. No retries happen here; retry policy
/// belongs to the caller.
pub struct RecordingController {
    config: SessionConfig,
    platform: Arc<dyn PlatformAdapter>,
    recorders: Arc<dyn RecorderFactory>,
    machine: Arc<StateMachine>,
    session: SharedSession,
    visualizer: Arc<Visualizer>,
    reaper: Arc<ResourceReaper>,
    observers: Mutex<Vec<Arc<dyn SessionObserver>>>,
}

impl RecordingController {
    pub fn new(
        config: SessionConfig,
        platform: Arc<dyn PlatformAdapter>,
        recorders: Arc<dyn RecorderFactory>,
        scheduler: Arc<dyn FrameScheduler>,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::Configuration)?;

        let machine = Arc::new(StateMachine::new());
        let session = new_shared_session();
        let visualizer = Arc::new(Visualizer::new(scheduler));
        let reaper = Arc::new(ResourceReaper::new(
            Arc::clone(&platform),
            Arc::clone(&machine),
            Arc::clone(&session),
            Arc::clone(&visualizer),
            config.clone(),
        ));

        Ok(Self::with_parts(
            config, platform, recorders, machine, session, visualizer, reaper,
        ))
    }

    pub(crate) fn with_parts(
        config: SessionConfig,
        platform: Arc<dyn PlatformAdapter>,
        recorders: Arc<dyn RecorderFactory>,
        machine: Arc<StateMachine>,
        session: SharedSession,
        visualizer: Arc<Visualizer>,
        reaper: Arc<ResourceReaper>,
    ) -> Self {
        Self {
            config,
            platform,
            recorders,
            machine,
            session,
            visualizer,
            reaper,
            observers: Mutex::new(Vec::new()),
        }
    }

    // --- Queries ---

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn is_recording(&self) -> bool {
        self.machine.state().is_recording()
    }

    pub fn latest_waveform(&self) -> WaveformFrame {
        self.visualizer.latest_frame()
    }

    // --- Subscriptions ---

    pub fn add_state_listener(&self, listener: TransitionListener) -> ListenerId {
        self.machine.add_listener(listener)
    }

    pub fn remove_state_listener(&self, id: ListenerId) {
        self.machine.remove_listener(id);
    }

    pub fn add_waveform_listener(&self, listener: WaveformListener) -> WaveformListenerId {
        self.visualizer.add_listener(listener)
    }

    pub fn remove_waveform_listener(&self, id: WaveformListenerId) {
        self.visualizer.remove_listener(id);
    }

    pub fn add_observer(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.lock().push(observer);
    }

    // --- Commands ---

    /// Begin a new capture session.
    ///
    /// Accepted from idle, from the two failure states (after routing
    /// through cleanup), and from recording (the stale session is reaped
    /// first rather than layered over). Permission denial leaves the
    /// machine in `PermissionDenied` — user-actionable, never auto-retried.
    pub fn start_session(&self) -> Result<(), CaptureError> {
        match self.machine.state() {
            SessionState::Recording => {
                log::warn!("start requested while recording; reaping stale session first");
                self.reaper.cleanup();
            }
            SessionState::PermissionDenied | SessionState::Error => self.reaper.cleanup(),
            SessionState::Idle => {}
            other => {
                return Err(CaptureError::InvalidState(format!(
                    "cannot start while {other}"
                )))
            }
        }

        // The transition doubles as the gate against a concurrent start.
        if !self.machine.set_state(SessionState::Initializing, None) {
            return Err(CaptureError::InvalidState(
                "another session is already starting".into(),
            ));
        }
        *self.session.lock() = Some(AudioSession::new());

        self.machine
            .set_state(SessionState::RequestingPermissions, None);

        let stream = match self.platform.request_permission(&self.config.constraints) {
            Ok(stream) => stream,
            Err(CaptureError::PermissionDenied) => {
                log::warn!("microphone permission denied");
                self.machine.set_state(
                    SessionState::PermissionDenied,
                    Some(CaptureError::PermissionDenied),
                );
                self.emit(|o| o.on_permission_denied(&PermissionDeniedEvent::new()));
                // Nothing was acquired; the deferred cleaning edge runs on
                // the next start.
                self.session.lock().take();
                return Err(CaptureError::PermissionDenied);
            }
            Err(error) => return self.fail(error),
        };
        self.with_session(|s| s.stream = Some(Arc::clone(&stream)));

        self.machine.set_state(SessionState::Ready, None);

        let support: &dyn MimeSupport = self.recorders.as_ref();
        let requested_mime = self.platform.select_mime_type(support);
        self.with_session(|s| s.mime_type = requested_mime.clone());

        let context = match self.platform.create_audio_context() {
            Ok(context) => context,
            Err(error) => return self.fail(error),
        };
        self.with_session(|s| s.context = Some(Arc::clone(&context)));

        let analyser = match context.create_analyser(&stream, self.config.waveform_bins) {
            Ok(analyser) => analyser,
            Err(error) => return self.fail(error),
        };
        self.with_session(|s| s.analyser = Some(Arc::clone(&analyser)));

        // From here on a failure must still release the stream: fail()
        // routes through the reaper, which stops the tracks it finds in
        // the session.
        let recorder = match self.recorders.create(&stream, &requested_mime) {
            Ok(recorder) => recorder,
            Err(error) => return self.fail(error),
        };
        self.with_session(|s| s.recorder = Some(Arc::clone(&recorder)));

        let chunks = {
            let guard = self.session.lock();
            match guard.as_ref() {
                Some(s) => Arc::clone(&s.chunks),
                None => {
                    drop(guard);
                    return self.fail(CaptureError::InvalidState(
                        "session vanished during start".into(),
                    ));
                }
            }
        };
        let on_chunk: ChunkCallback = Arc::new(move |bytes: &[u8]| {
            chunks.lock().push(bytes.to_vec());
        });

        if let Err(error) = recorder.start(self.config.chunk_interval, on_chunk) {
            return self.fail(error);
        }

        // When negotiation fell through to "" the recorder picked its own
        // container; record what it actually chose.
        let negotiated = recorder.mime_type();
        if !negotiated.is_empty() {
            self.with_session(|s| s.mime_type = negotiated.clone());
        }

        self.machine.set_state(SessionState::Recording, None);
        self.visualizer.start(analyser, self.config.waveform_bins);
        self.emit(|o| o.on_recording_started(&RecordingStartedEvent::new(&negotiated)));

        Ok(())
    }

    /// Finalize the recording and release all hardware resources.
    ///
    /// Resolves `Ok(None)` when there is nothing to stop, when a
    /// concurrent stop won the race, or when artifact assembly failed —
    /// hardware release and the reset to idle happen in every one of
    /// those cases.
    pub fn stop_session(&self) -> Result<Option<RecordedArtifact>, CaptureError> {
        let (recorder, chunks, mime_type) = {
            let guard = self.session.lock();
            match guard.as_ref().and_then(|s| {
                s.recorder
                    .as_ref()
                    .map(|r| (Arc::clone(r), Arc::clone(&s.chunks), s.mime_type.clone()))
            }) {
                Some(parts) => parts,
                None => return Ok(None),
            }
        };

        // The recording -> stopping transition is the mutual-exclusion
        // gate: a second stop racing this one loses and resolves no-op.
        if !self.machine.set_state(SessionState::Stopping, None) {
            return Ok(None);
        }

        if recorder.is_active() {
            let (tx, rx) = mpsc::channel();
            match recorder.request_stop(Box::new(move || {
                let _ = tx.send(());
            })) {
                Ok(()) => {
                    if rx.recv_timeout(self.config.finalize_timeout).is_err() {
                        log::warn!("recorder finalize timed out; assembling delivered chunks");
                    }
                }
                Err(error) => {
                    // Tracks are still force-stopped below and the machine
                    // still resets to idle.
                    log::warn!("recorder stop failed: {error}");
                }
            }
        }

        let drained = std::mem::take(&mut *chunks.lock());
        let artifact = RecordedArtifact::from_chunks(drained, &mime_type);

        // Hardware release is independent of assembly, so the microphone
        // indicator clears promptly even when finalize failed.
        self.reaper.cleanup();

        match artifact {
            Ok(artifact) => {
                self.emit(|o| {
                    o.on_recording_stopped(&RecordingStoppedEvent::new(
                        &artifact.mime_type,
                        artifact.byte_size(),
                    ))
                });
                Ok(Some(artifact))
            }
            Err(error) => {
                log::error!("artifact assembly failed: {error}");
                self.emit(|o| o.on_recording_error(&RecordingErrorEvent::new(&error)));
                Ok(None)
            }
        }
    }

    // --- Internal helpers ---

    /// The single error funnel: log, emit, clean up, then surface.
    fn fail(&self, error: CaptureError) -> Result<(), CaptureError> {
        log::error!(
            "capture session failed in state {}: {error}",
            self.machine.state()
        );
        self.machine
            .set_state(SessionState::Error, Some(error.clone()));
        self.emit(|o| o.on_recording_error(&RecordingErrorEvent::new(&error)));
        self.reaper.cleanup();
        Err(error)
    }

    fn with_session(&self, f: impl FnOnce(&mut AudioSession)) {
        if let Some(session) = self.session.lock().as_mut() {
            f(session);
        }
    }

    fn emit(&self, f: impl Fn(&dyn SessionObserver)) {
        let observers: Vec<Arc<dyn SessionObserver>> = self.observers.lock().clone();
        for observer in observers {
            f(observer.as_ref());
        }
    }
}
