//! Session protocol shared by all controller components.
//!
//! This module defines the session data shapes plus every message payload
//! broadcast to store subscribers and the presentation sink.

use std::collections::BTreeSet;

/// Placeholder rendered for missing track metadata.
pub const METADATA_PLACEHOLDER: &str = "—";

/// Cycle behavior applied when navigating beyond the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum CycleMode {
    #[default]
    None, // Stop after reaching the end of the playlist
    All, // Cycle the whole playlist
    One, // Repeat the current track
}

impl CycleMode {
    /// Next mode in the fixed `None -> All -> One -> None` cycle.
    pub fn advanced(self) -> CycleMode {
        match self {
            CycleMode::None => CycleMode::All,
            CycleMode::All => CycleMode::One,
            CycleMode::One => CycleMode::None,
        }
    }

    /// Integer value understood by the remote playback service.
    pub fn as_wire(self) -> u8 {
        match self {
            CycleMode::None => 0,
            CycleMode::All => 1,
            CycleMode::One => 2,
        }
    }
}

/// Immutable track descriptor returned by the remote playback service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Track {
    /// Opaque stable id, also the service-side lookup key.
    pub path: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Artwork reference resolved to a displayable URI by the sink.
    pub cover_ref: Option<String>,
}

impl Track {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(METADATA_PLACEHOLDER)
    }

    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or(METADATA_PLACEHOLDER)
    }

    /// Label shown in track lists: title and artist joined the way the sink
    /// renders them, with placeholders for missing tags.
    pub fn rendered_label(&self) -> String {
        format!("{} — {}", self.display_title(), self.display_artist())
    }
}

/// Origin of the currently rendered track collection. Exactly one source is
/// active at a time; switching replaces the rendered collection wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum PlaylistSource {
    /// Tracks of a single library folder.
    Folder(String),
    /// Every track the service knows about.
    #[default]
    Global,
    /// Ephemeral multi-folder playlist committed from selection mode.
    Temp(BTreeSet<String>),
}

/// Last polled transport position, advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct PlaybackProgress {
    /// Playback position in seconds.
    pub position: f64,
    /// Track duration in seconds.
    pub duration: f64,
}

/// The single mutable session aggregate owned by the session store.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct SessionState {
    /// Confirmed playing track, set only by command responses or push events.
    pub current_track_path: Option<String>,
    pub is_playing: bool,
    pub cycle_mode: CycleMode,
    pub shuffle_on: bool,
    /// Whether playlist multi-select is active.
    pub selection_mode: bool,
    /// Folder names accumulated while `selection_mode` is true; empty otherwise.
    pub selected_folders: BTreeSet<String>,
    pub active_source: PlaylistSource,
    pub progress: PlaybackProgress,
}

/// Top-level envelope for all bus traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Session(SessionMessage),
    Sink(SinkMessage),
}

/// Store-domain notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMessage {
    /// Published after every store mutation with the fully-formed new state.
    StateChanged(SessionState),
}

/// One-way render directives for the presentation sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    RenderFolderList(Vec<String>),
    RenderTrackList(Vec<Track>),
    HighlightPlayingTrack(Option<String>),
    RenderNowPlaying(Option<Track>),
    RenderProgress { position: f64, duration: f64 },
    AppendLog(String),
    /// Delegated to theme application outside session state.
    ThemeChanged(String),
    /// Delegated to locale application outside session state.
    LanguageChanged(String),
}
