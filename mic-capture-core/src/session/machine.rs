use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::models::state::{SessionState, TransitionRecord};

/// Listener called with the transition record on every accepted transition.
pub type TransitionListener = Arc<dyn Fn(&TransitionRecord) + Send + Sync + 'static>;

/// Handle returned by `add_listener`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

struct MachineInner {
    state: SessionState,
    listeners: Vec<(u64, TransitionListener)>,
    next_listener_id: u64,
}

/// Single source of truth for session state and transition validity.
///
/// Illegal transitions are logged and ignored rather than panicking, so a
/// caller racing a state change cannot crash the session. The
/// single-threaded-event-loop model plus transition validation together
/// prevent two sessions from being active at once; there is no other
/// locking.
pub struct StateMachine {
    inner: Mutex<MachineInner>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MachineInner {
                state: SessionState::Idle,
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
        }
    }

    /// Current state, synchronously.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Apply a transition if it is in the adjacency.
    ///
    /// Returns `false` (after logging) when the transition is not reachable
    /// from the current state; the state is left unchanged.
    pub fn set_state(&self, next: SessionState, error: Option<CaptureError>) -> bool {
        let (record, listeners) = {
            let mut inner = self.inner.lock();
            let previous = inner.state;

            if !previous.can_transition_to(next) {
                log::warn!("rejected state transition {previous} -> {next}");
                return false;
            }

            inner.state = next;
            log::info!("session state: {previous} -> {next}");

            let record = TransitionRecord {
                previous,
                next,
                error,
                timestamp: chrono::Utc::now(),
            };
            let listeners: Vec<TransitionListener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (record, listeners)
        };

        // Listeners run outside the lock so they may query state freely.
        for listener in listeners {
            listener(&record);
        }
        true
    }

    pub fn add_listener(&self, listener: TransitionListener) -> ListenerId {
        let mut inner = self.inner.lock();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, listener));
        ListenerId(id)
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.inner.lock().listeners.retain(|(lid, _)| *lid != id.0);
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
