//! Fixed-interval transport progress polling.

use std::{sync::atomic::Ordering, time::Duration};

use log::warn;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use crate::{protocol::SinkMessage, session_manager::SessionManager};

impl SessionManager {
    /// One poll tick: requests `{position, duration}` for the current track.
    ///
    /// No call is issued while nothing is playing or while the previous poll
    /// is still in flight; a response that arrives after the current track
    /// changed is discarded. Polling never touches `current_track_path` or
    /// `is_playing`.
    pub fn poll_progress_tick(&self) {
        let issued_for = match self.store.snapshot().current_track_path {
            Some(path) => path,
            None => return,
        };
        if self.poll_in_flight.swap(true, Ordering::SeqCst) {
            return;
        }
        let this = self.clone();
        tokio::spawn(async move {
            match this.service.get_playback_info().await {
                Ok(progress) => {
                    let still_current = this.store.snapshot().current_track_path.as_deref()
                        == Some(issued_for.as_str());
                    if still_current {
                        this.store.apply(move |state| state.progress = progress);
                        this.send_sink(SinkMessage::RenderProgress {
                            position: progress.position,
                            duration: progress.duration,
                        });
                    }
                }
                Err(error) => warn!("Poll loop: get_playback_info failed: {}", error),
            }
            this.poll_in_flight.store(false, Ordering::SeqCst);
        });
    }
}

/// Spawns the ticker driving [`SessionManager::poll_progress_tick`].
pub fn spawn_progress_poll_loop(manager: SessionManager, interval_ms: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            manager.poll_progress_tick();
        }
    })
}
