//! Applies service-initiated push events to the session state.
//!
//! Push events are the backend's own ground truth and bypass the token
//! mechanism entirely: they apply unconditionally and invalidate any command
//! still in flight for the previous track.

use log::warn;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{
    backend::PushEvent, protocol::SinkMessage, reconciler::RequestClass,
    session_manager::SessionManager,
};

impl SessionManager {
    /// Applies one push event unconditionally.
    pub(crate) fn apply_push_event(&self, event: PushEvent) {
        match event {
            PushEvent::TrackChanged(track) => {
                self.tokens.supersede(RequestClass::Track);
                let path = track.as_ref().map(|t| t.path.clone());
                let path_for_state = path.clone();
                self.store
                    .apply(move |state| state.current_track_path = path_for_state);
                self.send_sink(SinkMessage::RenderNowPlaying(track));
                self.send_sink(SinkMessage::HighlightPlayingTrack(path));
            }
            PushEvent::PlaybackStateChanged(is_playing) => {
                self.store.apply(move |state| state.is_playing = is_playing);
            }
            PushEvent::ThemeChanged(theme) => {
                self.send_sink(SinkMessage::ThemeChanged(theme));
            }
            PushEvent::LanguageChanged(language) => {
                self.send_sink(SinkMessage::LanguageChanged(language));
            }
            PushEvent::LogSignal(message) => {
                self.send_sink(SinkMessage::AppendLog(message));
            }
        }
    }
}

/// Spawns the drain loop for the service's push-event channel.
pub fn spawn_push_event_handler(
    manager: SessionManager,
    mut events: broadcast::Receiver<PushEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => manager.apply_push_event(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Push handler lagged on service events, skipped {} message(s)",
                        skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
