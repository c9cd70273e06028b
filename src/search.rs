//! Local track filtering over rendered labels.
//!
//! A pure, synchronous projection of the currently rendered collection; it
//! never reaches the remote playback service and never mutates session state.

use crate::protocol::Track;

fn label_contains(track: &Track, needle: &str) -> bool {
    track.rendered_label().to_lowercase().contains(needle)
}

/// Whether `track` stays visible for `query`: case-folded containment over
/// the full rendered title-and-artist label.
pub fn matches_query(track: &Track, query: &str) -> bool {
    label_contains(track, &query.trim().to_lowercase())
}

/// Projects the rendered collection down to the entries visible for `query`.
pub fn filter_tracks<'a>(tracks: &'a [Track], query: &str) -> Vec<&'a Track> {
    let needle = query.trim().to_lowercase();
    tracks
        .iter()
        .filter(|track| label_contains(track, &needle))
        .collect()
}
