//! Session-state reconciliation core for a remote-backend music player.
//!
//! The controller keeps one consistent view of "what track is playing, in
//! what mode, from what source" while truth arrives over three uncoordinated
//! channels: command responses, unsolicited push notifications, and a
//! fixed-interval progress poll. A last-issued-wins token scheme decides
//! which responses may still touch the state; everything the controller
//! publishes flows over one broadcast bus to store subscribers and the
//! presentation sink.

pub mod backend;
pub mod config;
pub mod logging;
pub mod poll_loop;
pub mod protocol;
pub mod push_handler;
pub mod reconciler;
pub mod search;
pub mod session_manager;
pub mod session_store;

#[cfg(test)]
mod test_support;

pub use backend::{PushEvent, RemotePlaybackService};
pub use config::ControllerConfig;
pub use protocol::{
    CycleMode, Message, PlaybackProgress, PlaylistSource, SessionMessage, SessionState,
    SinkMessage, Track,
};
pub use session_manager::SessionManager;
pub use session_store::SessionStore;
