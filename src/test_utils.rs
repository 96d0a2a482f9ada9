//! Test utilities and fixtures for harmonic-mix tests.
//!
//! Provides track factories and a pre-filled store so tests can describe
//! a library in one line.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{store_with, track};
//!
//! let store = store_with(vec![track("a", "8A", 124.0, 7), track("b", "9A", 126.0, 8)]);
//! ```

use crate::library::TrackStore;
use crate::model::{Suggestion, Track, TrackDraft, TrackId};

/// Creates a track whose title and artist are derived from `id`
/// (`"Track {id}"` / `"Artist {id}"`).
pub fn track(id: &str, key: &str, bpm: f64, energy: u8) -> Track {
    Track {
        id: TrackId::new(id),
        title: format!("Track {id}"),
        artist: format!("Artist {id}"),
        key: key.to_string(),
        bpm,
        energy,
    }
}

/// Creates an analysis result with the same naming scheme as [`track`].
pub fn draft(id: &str, key: &str, bpm: f64, energy: u8) -> TrackDraft {
    let t = track(id, key, bpm, energy);
    TrackDraft {
        title: t.title,
        artist: t.artist,
        key: t.key,
        bpm: t.bpm,
        energy: t.energy,
    }
}

/// A suggestion that resolves to `track(id, ..)`.
pub fn suggestion_for(id: &str) -> Suggestion {
    Suggestion {
        title: format!("Track {id}"),
        artist: format!("Artist {id}"),
        reason: format!("mixes well into {id}"),
    }
}

/// A store containing `tracks` in order.
///
/// Panics on duplicate ids; fixtures are expected to be well formed.
pub fn store_with(tracks: Vec<Track>) -> TrackStore {
    let mut store = TrackStore::new();
    for t in tracks {
        store.add(t).expect("duplicate id in test fixture");
    }
    store
}
