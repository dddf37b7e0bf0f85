use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::models::config::SessionConfig;
use crate::models::state::SessionState;
use crate::session::audio_session::{AudioSession, SharedSession};
use crate::session::machine::StateMachine;
use crate::session::visualizer::Visualizer;
use crate::traits::media::TrackState;
use crate::traits::platform_adapter::PlatformAdapter;

struct ReapGate {
    in_flight: bool,
}

/// Centralized, idempotent session teardown.
///
/// `cleanup` is safe to call from any state and safe to call concurrently:
/// late callers join the in-flight teardown instead of racing to release
/// the same handles twice. Every step is individually fault-tolerant — a
/// failing step logs a warning and the sequence continues, because nothing
/// left half-torn-down is acceptable.
///
/// This is the only component that transitions the machine back to idle
/// from a non-terminal state; it is the system's safety valve.
pub struct ResourceReaper {
    platform: Arc<dyn PlatformAdapter>,
    machine: Arc<StateMachine>,
    session: SharedSession,
    visualizer: Arc<Visualizer>,
    config: SessionConfig,
    gate: Mutex<ReapGate>,
    done: Condvar,
}

impl ResourceReaper {
    pub fn new(
        platform: Arc<dyn PlatformAdapter>,
        machine: Arc<StateMachine>,
        session: SharedSession,
        visualizer: Arc<Visualizer>,
        config: SessionConfig,
    ) -> Self {
        Self {
            platform,
            machine,
            session,
            visualizer,
            config,
            gate: Mutex::new(ReapGate { in_flight: false }),
            done: Condvar::new(),
        }
    }

    /// Release every session resource and reset the machine to idle.
    ///
    /// Concurrent callers block until the single in-flight teardown
    /// completes, then return; exactly one teardown sequence executes.
    pub fn cleanup(&self) {
        {
            let mut gate = self.gate.lock();
            if gate.in_flight {
                while gate.in_flight {
                    self.done.wait(&mut gate);
                }
                return;
            }
            gate.in_flight = true;
        }

        self.run_teardown();

        let mut gate = self.gate.lock();
        gate.in_flight = false;
        self.done.notify_all();
    }

    fn run_teardown(&self) {
        // Cancel the frame loop first: a tick against a closing graph is a
        // correctness bug, not cosmetic.
        self.visualizer.cancel();

        let session = self.session.lock().take();

        let Some(session) = session else {
            // Nothing to release; still reset a machine stranded off idle
            // (e.g. permission_denied from a previous attempt).
            if !self.machine.state().is_idle() {
                self.machine.set_state(SessionState::Cleaning, None);
                self.machine.set_state(SessionState::Idle, None);
            }
            return;
        };

        self.machine.set_state(SessionState::Cleaning, None);
        log::info!("reaping session {}", session.id);

        self.stop_recorder(&session);
        self.stop_tracks(&session);

        if let Some(analyser) = &session.analyser {
            analyser.disconnect();
        }

        if let Some(context) = &session.context {
            if let Err(e) = self.platform.teardown_context(context.as_ref()) {
                log::warn!("audio context teardown failed: {e}");
            }
        }

        // All fields drop here; nothing survives into the next session.
        drop(session);

        self.machine.set_state(SessionState::Idle, None);
    }

    fn stop_recorder(&self, session: &AudioSession) {
        let Some(recorder) = &session.recorder else {
            return;
        };
        if !recorder.is_active() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        match recorder.request_stop(Box::new(move || {
            let _ = tx.send(());
        })) {
            Ok(()) => {
                if rx.recv_timeout(self.config.finalize_timeout).is_err() {
                    log::warn!("recorder finalize timed out; continuing teardown");
                }
            }
            Err(e) => log::warn!("recorder stop failed during teardown: {e}"),
        }
    }

    fn stop_tracks(&self, session: &AudioSession) {
        let Some(stream) = &session.stream else {
            return;
        };

        let tracks = stream.audio_tracks();
        for track in &tracks {
            track.stop();
        }

        // Wait briefly for each track's "ended" acknowledgment so the
        // hardware indicator clears before we report idle.
        let deadline = Instant::now() + self.config.track_stop_timeout;
        for track in &tracks {
            while track.ready_state() == TrackState::Live && Instant::now() < deadline {
                std::thread::sleep(self.config.track_poll_interval);
            }
            if track.ready_state() == TrackState::Live {
                log::warn!("media track did not acknowledge stop before timeout");
            }
        }
    }
}
