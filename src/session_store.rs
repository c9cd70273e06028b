//! Single-writer owner of the canonical session state.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::protocol::{Message, SessionMessage, SessionState};

/// Sole owner of [`SessionState`]. Every other component reads snapshots and
/// requests mutations through this store; each mutation publishes the new
/// state on the shared bus.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    bus: broadcast::Sender<Message>,
}

impl SessionStore {
    pub fn new(bus: broadcast::Sender<Message>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            bus,
        }
    }

    /// Read-only snapshot of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state
            .lock()
            .expect("session state lock poisoned")
            .clone()
    }

    /// Runs `mutation` on the state and publishes the result to subscribers.
    ///
    /// The snapshot is published before the lock is released, so subscribers
    /// observe fully-formed states in apply order. Returns the new state.
    pub fn apply(&self, mutation: impl FnOnce(&mut SessionState)) -> SessionState {
        let mut state = self.state.lock().expect("session state lock poisoned");
        mutation(&mut state);
        let snapshot = state.clone();
        let _ = self
            .bus
            .send(Message::Session(SessionMessage::StateChanged(
                snapshot.clone(),
            )));
        snapshot
    }

    /// Subscribes to bus traffic, state snapshots included.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.bus.subscribe()
    }
}
