//! Remote playback service boundary.
//!
//! The backend owning actual media playback, library indexing, and
//! downloading sits behind this trait; the controller only ever sees an
//! opaque async request/response surface plus an unsolicited push channel.

use tokio::sync::broadcast;

use crate::protocol::{PlaybackProgress, Track};

/// Service-initiated notification delivered outside any request/response
/// pair, e.g. an automatic advance at end-of-track.
#[derive(Debug, Clone)]
pub enum PushEvent {
    /// The service switched tracks on its own; `None` clears playback.
    TrackChanged(Option<Track>),
    PlaybackStateChanged(bool),
    /// Delegated to theme application, not session state.
    ThemeChanged(String),
    /// Delegated to locale application, not session state.
    LanguageChanged(String),
    /// Free-form service log line for the debug display.
    LogSignal(String),
}

/// Interface implemented by concrete remote playback services.
///
/// Calls resolve asynchronously and may complete in any order; the caller is
/// responsible for discarding superseded responses. Errors are descriptive
/// strings and never fatal.
#[async_trait::async_trait]
pub trait RemotePlaybackService: Send + Sync {
    async fn get_folders(&self) -> Result<Vec<String>, String>;
    async fn set_playlist(&self, folder: &str) -> Result<Vec<Track>, String>;
    async fn set_global_playlist(&self) -> Result<Vec<Track>, String>;
    async fn create_temp_playlist(&self, folders: &[String]) -> Result<Vec<Track>, String>;
    async fn get_playlist(&self) -> Result<Vec<Track>, String>;
    async fn play_track(&self, path: &str) -> Result<Option<Track>, String>;
    async fn next_track(&self) -> Result<Option<Track>, String>;
    async fn prev_track(&self) -> Result<Option<Track>, String>;
    /// No confirmation payload; the state push reports the outcome.
    async fn toggle_pause(&self) -> Result<(), String>;
    async fn toggle_shuffle(&self) -> Result<bool, String>;
    async fn set_cycle_mode(&self, mode: u8) -> Result<(), String>;
    async fn seek(&self, position_secs: f64) -> Result<(), String>;
    async fn get_playback_info(&self) -> Result<PlaybackProgress, String>;
    async fn start_download(&self, url: &str, folder: &str) -> Result<(), String>;

    /// Receiver for unsolicited service events.
    fn push_events(&self) -> broadcast::Receiver<PushEvent>;
}
