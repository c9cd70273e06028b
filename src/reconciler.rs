//! Request tokens deciding whether an async response may still apply.
//!
//! Every state-changing request is tagged with a fresh token from a shared
//! monotonic counter; each request class remembers only the newest token it
//! issued. A response whose token is no longer the newest of its class lost
//! the race to a later request and must be dropped.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Request families that supersede each other independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Commands targeting the identity of the playing track.
    Track,
    /// Commands replacing the rendered track collection.
    Playlist,
}

/// Monotonic token issuer with one latest-wins cell per request class.
#[derive(Debug, Clone, Default)]
pub struct RequestTokens {
    inner: Arc<TokenCells>,
}

#[derive(Debug, Default)]
struct TokenCells {
    next: AtomicU64,
    latest_track: AtomicU64,
    latest_playlist: AtomicU64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, class: RequestClass) -> &AtomicU64 {
        match class {
            RequestClass::Track => &self.inner.latest_track,
            RequestClass::Playlist => &self.inner.latest_playlist,
        }
    }

    /// Issues a fresh token and marks it the newest of its class. Must run
    /// before the tagged request is awaited.
    pub fn issue(&self, class: RequestClass) -> u64 {
        let token = self.inner.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.cell(class).store(token, Ordering::SeqCst);
        token
    }

    /// Whether a response carrying `token` is still the newest of its class.
    pub fn is_current(&self, class: RequestClass, token: u64) -> bool {
        self.cell(class).load(Ordering::SeqCst) == token
    }

    /// Invalidates every in-flight request of `class` by burning a token
    /// nobody holds. Used when a push event outranks pending commands.
    pub fn supersede(&self, class: RequestClass) {
        let token = self.inner.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.cell(class).store(token, Ordering::SeqCst);
    }
}
