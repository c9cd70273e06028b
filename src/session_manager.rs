//! Gesture-facing session manager.
//!
//! Issues commands against the remote playback service and applies only the
//! confirmed results that still hold the newest token of their request
//! class, so a quickly-resolving stale response can never overwrite a more
//! recent user choice.

use std::{
    collections::BTreeSet,
    sync::{atomic::AtomicBool, Arc},
};

use log::{debug, warn};
use tokio::sync::broadcast::Sender;

use crate::{
    backend::RemotePlaybackService,
    config::ControllerConfig,
    poll_loop::spawn_progress_poll_loop,
    protocol::{Message, PlaylistSource, SinkMessage, Track},
    push_handler::spawn_push_event_handler,
    reconciler::{RequestClass, RequestTokens},
    session_store::SessionStore,
};

/// Command reconciler and mode state machines; cheap to clone, all handles
/// shared. Commands return immediately, their effects arrive through the
/// store once the service confirms them.
#[derive(Clone)]
pub struct SessionManager {
    pub(crate) service: Arc<dyn RemotePlaybackService>,
    pub(crate) store: SessionStore,
    pub(crate) tokens: RequestTokens,
    pub(crate) bus: Sender<Message>,
    pub(crate) config: ControllerConfig,
    pub(crate) poll_in_flight: Arc<AtomicBool>,
}

impl SessionManager {
    pub fn new(
        service: Arc<dyn RemotePlaybackService>,
        store: SessionStore,
        bus: Sender<Message>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            service,
            store,
            tokens: RequestTokens::new(),
            bus,
            config,
            poll_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawns the push-event handler and the progress poll loop, then
    /// requests the folder list for the initial render.
    pub fn start(&self) {
        spawn_push_event_handler(self.clone(), self.service.push_events());
        spawn_progress_poll_loop(self.clone(), self.config.poll_interval_ms);
        self.refresh_folders();
    }

    // ==== Playback controls ====

    /// Plays a specific track by path.
    pub fn play_track(&self, path: String) {
        let token = self.tokens.issue(RequestClass::Track);
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.play_track(&path).await {
                Ok(Some(track)) => this.apply_track_result(token, track),
                Ok(None) => debug!("SessionManager: play_track ignored for {}", path),
                Err(error) => {
                    warn!("SessionManager: play_track failed for {}: {}", path, error)
                }
            }
        });
    }

    pub fn next_track(&self) {
        let token = self.tokens.issue(RequestClass::Track);
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.next_track().await {
                Ok(Some(track)) => this.apply_track_result(token, track),
                Ok(None) => debug!("SessionManager: next_track has nowhere to go"),
                Err(error) => warn!("SessionManager: next_track failed: {}", error),
            }
        });
    }

    pub fn prev_track(&self) {
        let token = self.tokens.issue(RequestClass::Track);
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.prev_track().await {
                Ok(Some(track)) => this.apply_track_result(token, track),
                Ok(None) => debug!("SessionManager: prev_track has nowhere to go"),
                Err(error) => warn!("SessionManager: prev_track failed: {}", error),
            }
        });
    }

    /// Optimistic play/pause flip; the backend's state push wins on conflict.
    /// No-op while nothing is playing.
    pub fn toggle_pause(&self) {
        if self.store.snapshot().current_track_path.is_none() {
            return;
        }
        self.store.apply(|state| state.is_playing = !state.is_playing);
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(error) = this.service.toggle_pause().await {
                warn!("SessionManager: toggle_pause failed: {}", error);
            }
        });
    }

    /// Fire-and-forget seek; progress is corrected by the next poll.
    pub fn seek(&self, position_secs: f64) {
        if self.store.snapshot().current_track_path.is_none() {
            return;
        }
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(error) = this.service.seek(position_secs).await {
                warn!("SessionManager: seek failed: {}", error);
            }
        });
    }

    // ==== Mode controls ====

    /// Steps the cycle mode and reports the new value to the service without
    /// awaiting confirmation.
    pub fn advance_cycle_mode(&self) {
        let state = self
            .store
            .apply(|state| state.cycle_mode = state.cycle_mode.advanced());
        let mode = state.cycle_mode;
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(error) = this.service.set_cycle_mode(mode.as_wire()).await {
                warn!(
                    "SessionManager: set_cycle_mode({}) failed: {}",
                    mode.as_wire(),
                    error
                );
            }
        });
    }

    /// Asks the service to flip shuffle and re-fetches the playlist so the
    /// rendered order is the service's order, never a local reshuffle.
    pub fn toggle_shuffle(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.toggle_shuffle().await {
                Ok(shuffle_on) => {
                    this.store.apply(move |state| state.shuffle_on = shuffle_on);
                    let token = this.tokens.issue(RequestClass::Playlist);
                    match this.service.get_playlist().await {
                        Ok(tracks) => this.apply_playlist_result(token, tracks, None),
                        Err(error) => warn!(
                            "SessionManager: playlist re-fetch after shuffle failed: {}",
                            error
                        ),
                    }
                }
                Err(error) => warn!("SessionManager: toggle_shuffle failed: {}", error),
            }
        });
    }

    // ==== Playlist selection ====

    /// Folder click: replaces the playlist in normal mode; in selection mode
    /// toggles membership and fetches a preview without switching the source.
    pub fn select_folder(&self, folder: String) {
        if self.store.snapshot().selection_mode {
            let toggled = folder.clone();
            self.store.apply(move |state| {
                if !state.selected_folders.remove(&toggled) {
                    state.selected_folders.insert(toggled);
                }
            });
            let token = self.tokens.issue(RequestClass::Playlist);
            let this = self.clone();
            tokio::spawn(async move {
                match this.service.set_playlist(&folder).await {
                    Ok(tracks) => this.apply_playlist_result(token, tracks, None),
                    Err(error) => warn!(
                        "SessionManager: preview fetch for {} failed: {}",
                        folder, error
                    ),
                }
            });
            return;
        }

        let token = self.tokens.issue(RequestClass::Playlist);
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.set_playlist(&folder).await {
                Ok(tracks) => this.apply_playlist_result(
                    token,
                    tracks,
                    Some(PlaylistSource::Folder(folder)),
                ),
                Err(error) => {
                    warn!("SessionManager: set_playlist({}) failed: {}", folder, error)
                }
            }
        });
    }

    /// Replaces the rendered collection with every track the service knows.
    pub fn open_global_playlist(&self) {
        let token = self.tokens.issue(RequestClass::Playlist);
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.set_global_playlist().await {
                Ok(tracks) => {
                    this.apply_playlist_result(token, tracks, Some(PlaylistSource::Global))
                }
                Err(error) => warn!("SessionManager: set_global_playlist failed: {}", error),
            }
        });
    }

    /// Enters or commits playlist multi-select. Committing a non-empty set
    /// requests one ephemeral playlist built from the selected folders; an
    /// empty commit issues no request.
    pub fn toggle_selection_mode(&self) {
        if !self.store.snapshot().selection_mode {
            self.store.apply(|state| {
                state.selection_mode = true;
                state.selected_folders.clear();
            });
            return;
        }

        let mut selected = BTreeSet::new();
        self.store.apply(|state| {
            state.selection_mode = false;
            selected = std::mem::take(&mut state.selected_folders);
        });
        if selected.is_empty() {
            debug!("SessionManager: selection commit with no folders, nothing to request");
            return;
        }

        let token = self.tokens.issue(RequestClass::Playlist);
        let folders: Vec<String> = selected.iter().cloned().collect();
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.create_temp_playlist(&folders).await {
                Ok(tracks) => this.apply_playlist_result(
                    token,
                    tracks,
                    Some(PlaylistSource::Temp(selected)),
                ),
                Err(error) => warn!("SessionManager: create_temp_playlist failed: {}", error),
            }
        });
    }

    // ==== Downloading ====

    /// Validates and dispatches a download request; progress and completion
    /// are reported by the service through `LogSignal` pushes.
    pub fn start_download(&self, url: &str, folder: &str) {
        let url = url.trim().to_string();
        if url.is_empty() {
            self.send_sink(SinkMessage::AppendLog("Please enter a URL!".to_string()));
            return;
        }
        let folder = match folder.trim() {
            "" => self.config.default_download_folder.clone(),
            trimmed => trimmed.to_string(),
        };
        self.send_sink(SinkMessage::AppendLog(
            "Download started...\nIt'll take a couple of minutes.".to_string(),
        ));
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(error) = this.service.start_download(&url, &folder).await {
                warn!("SessionManager: start_download failed: {}", error);
                this.send_sink(SinkMessage::AppendLog(format!(
                    "Download failed: {}",
                    error
                )));
            }
        });
    }

    // ==== Folders ====

    /// Fetches the folder list for the sidebar render.
    pub fn refresh_folders(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.get_folders().await {
                Ok(folders) => this.send_sink(SinkMessage::RenderFolderList(folders)),
                Err(error) => warn!("SessionManager: get_folders failed: {}", error),
            }
        });
    }

    // ==== Confirmed-result application ====

    /// Confirmed track switch, applied only while its token is still the
    /// newest of the track class; superseded responses are dropped silently.
    fn apply_track_result(&self, token: u64, track: Track) {
        if !self.tokens.is_current(RequestClass::Track, token) {
            return;
        }
        let path = track.path.clone();
        self.store.apply(move |state| {
            state.current_track_path = Some(path);
            state.is_playing = true;
        });
        self.send_sink(SinkMessage::RenderNowPlaying(Some(track.clone())));
        self.send_sink(SinkMessage::HighlightPlayingTrack(Some(track.path)));
    }

    /// Confirmed playlist replacement, rendered only while its token is still
    /// the newest of the playlist class. `new_source` switches the active
    /// source; preview fetches pass `None` and leave it untouched.
    fn apply_playlist_result(
        &self,
        token: u64,
        tracks: Vec<Track>,
        new_source: Option<PlaylistSource>,
    ) {
        if !self.tokens.is_current(RequestClass::Playlist, token) {
            return;
        }
        if let Some(source) = new_source {
            self.store.apply(move |state| state.active_source = source);
        }
        let current = self.store.snapshot().current_track_path;
        self.send_sink(SinkMessage::RenderTrackList(tracks));
        self.send_sink(SinkMessage::HighlightPlayingTrack(current));
    }

    pub(crate) fn send_sink(&self, message: SinkMessage) {
        let _ = self.bus.send(Message::Sink(message));
    }
}
