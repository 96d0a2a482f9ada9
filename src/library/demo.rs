//! Built-in demo crate for trying the assistant without any files.

use crate::model::{Track, TrackId};

pub fn demo_tracks() -> Vec<Track> {
    [
        ("demo1.mp3", "Cosmic Echoes", "Stellar Drifters", "8A", 124.0, 7),
        ("demo2.mp3", "Neon Sunset", "Grid Runner", "8B", 125.0, 8),
        ("demo3.mp3", "Deep Ocean Groove", "Aqua Funk", "7A", 122.0, 6),
        ("demo4.mp3", "Lunar Phases", "Night Voyager", "9A", 124.0, 7),
        ("demo5.mp3", "Rhythm of the Dunes", "Desert Wave", "10A", 128.0, 9),
        ("demo6.mp3", "First Light", "Solaris", "7B", 122.0, 5),
    ]
    .into_iter()
    .map(|(id, title, artist, key, bpm, energy)| Track {
        id: TrackId::new(id),
        title: title.to_string(),
        artist: artist.to_string(),
        key: key.to_string(),
        bpm,
        energy,
    })
    .collect()
}
