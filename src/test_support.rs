//! Test doubles shared by the controller's module tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use tokio::sync::{broadcast, Notify};

use crate::{
    backend::{PushEvent, RemotePlaybackService},
    protocol::{Message, PlaybackProgress, SinkMessage, Track},
};

/// Yields enough scheduler turns for spawned controller tasks to settle.
pub(crate) async fn drive() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

pub(crate) fn track(path: &str) -> Track {
    Track {
        path: path.to_string(),
        title: Some(format!("Title of {}", path)),
        artist: Some("Artist".to_string()),
        cover_ref: None,
    }
}

/// Drains every queued sink directive off an observer receiver.
pub(crate) fn drain_sink(observer: &mut broadcast::Receiver<Message>) -> Vec<SinkMessage> {
    let mut sink = Vec::new();
    while let Ok(message) = observer.try_recv() {
        if let Message::Sink(directive) = message {
            sink.push(directive);
        }
    }
    sink
}

/// Scripted reply released immediately, or held until its gate is notified.
pub(crate) struct GatedReply<T> {
    pub value: Result<T, String>,
    pub gate: Option<Arc<Notify>>,
}

impl<T> GatedReply<T> {
    pub fn ready(value: Result<T, String>) -> Self {
        Self { value, gate: None }
    }

    pub fn gated(value: Result<T, String>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                value,
                gate: Some(gate.clone()),
            },
            gate,
        )
    }
}

async fn resolve<T>(queue: &Mutex<VecDeque<GatedReply<T>>>, fallback: T) -> Result<T, String> {
    let reply = { queue.lock().unwrap().pop_front() };
    match reply {
        Some(reply) => {
            if let Some(gate) = reply.gate {
                gate.notified().await;
            }
            reply.value
        }
        None => Ok(fallback),
    }
}

/// Scriptable stand-in for the remote playback service. Records every call
/// and pops pre-queued replies; queues left empty resolve to inert defaults.
pub(crate) struct FakePlaybackService {
    push_tx: broadcast::Sender<PushEvent>,
    calls: Mutex<Vec<String>>,
    track_replies: Mutex<VecDeque<GatedReply<Option<Track>>>>,
    playlist_replies: Mutex<VecDeque<GatedReply<Vec<Track>>>>,
    shuffle_replies: Mutex<VecDeque<GatedReply<bool>>>,
    progress_replies: Mutex<VecDeque<GatedReply<PlaybackProgress>>>,
    folder_replies: Mutex<VecDeque<GatedReply<Vec<String>>>>,
}

impl FakePlaybackService {
    pub fn new() -> Self {
        let (push_tx, _) = broadcast::channel(64);
        Self {
            push_tx,
            calls: Mutex::new(Vec::new()),
            track_replies: Mutex::new(VecDeque::new()),
            playlist_replies: Mutex::new(VecDeque::new()),
            shuffle_replies: Mutex::new(VecDeque::new()),
            progress_replies: Mutex::new(VecDeque::new()),
            folder_replies: Mutex::new(VecDeque::new()),
        }
    }

    pub fn emit(&self, event: PushEvent) {
        let _ = self.push_tx.send(event);
    }

    /// Inherent mirror of the trait's `push_events` for tests that only hold
    /// the concrete fake.
    pub fn push_events_receiver(&self) -> broadcast::Receiver<PushEvent> {
        self.push_tx.subscribe()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn queue_track_reply(&self, reply: GatedReply<Option<Track>>) {
        self.track_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_playlist_reply(&self, reply: GatedReply<Vec<Track>>) {
        self.playlist_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_shuffle_reply(&self, reply: GatedReply<bool>) {
        self.shuffle_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_progress_reply(&self, reply: GatedReply<PlaybackProgress>) {
        self.progress_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_folder_reply(&self, reply: GatedReply<Vec<String>>) {
        self.folder_replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait::async_trait]
impl RemotePlaybackService for FakePlaybackService {
    async fn get_folders(&self) -> Result<Vec<String>, String> {
        self.record("get_folders");
        resolve(&self.folder_replies, Vec::new()).await
    }

    async fn set_playlist(&self, folder: &str) -> Result<Vec<Track>, String> {
        self.record(format!("set_playlist:{}", folder));
        resolve(&self.playlist_replies, Vec::new()).await
    }

    async fn set_global_playlist(&self) -> Result<Vec<Track>, String> {
        self.record("set_global_playlist");
        resolve(&self.playlist_replies, Vec::new()).await
    }

    async fn create_temp_playlist(&self, folders: &[String]) -> Result<Vec<Track>, String> {
        let mut sorted = folders.to_vec();
        sorted.sort();
        self.record(format!("create_temp_playlist:{}", sorted.join("+")));
        resolve(&self.playlist_replies, Vec::new()).await
    }

    async fn get_playlist(&self) -> Result<Vec<Track>, String> {
        self.record("get_playlist");
        resolve(&self.playlist_replies, Vec::new()).await
    }

    async fn play_track(&self, path: &str) -> Result<Option<Track>, String> {
        self.record(format!("play_track:{}", path));
        resolve(&self.track_replies, None).await
    }

    async fn next_track(&self) -> Result<Option<Track>, String> {
        self.record("next_track");
        resolve(&self.track_replies, None).await
    }

    async fn prev_track(&self) -> Result<Option<Track>, String> {
        self.record("prev_track");
        resolve(&self.track_replies, None).await
    }

    async fn toggle_pause(&self) -> Result<(), String> {
        self.record("toggle_pause");
        Ok(())
    }

    async fn toggle_shuffle(&self) -> Result<bool, String> {
        self.record("toggle_shuffle");
        resolve(&self.shuffle_replies, false).await
    }

    async fn set_cycle_mode(&self, mode: u8) -> Result<(), String> {
        self.record(format!("set_cycle_mode:{}", mode));
        Ok(())
    }

    async fn seek(&self, position_secs: f64) -> Result<(), String> {
        self.record(format!("seek:{}", position_secs));
        Ok(())
    }

    async fn get_playback_info(&self) -> Result<PlaybackProgress, String> {
        self.record("get_playback_info");
        resolve(&self.progress_replies, PlaybackProgress::default()).await
    }

    async fn start_download(&self, url: &str, folder: &str) -> Result<(), String> {
        self.record(format!("start_download:{}:{}", url, folder));
        Ok(())
    }

    fn push_events(&self) -> broadcast::Receiver<PushEvent> {
        self.push_tx.subscribe()
    }
}
