//! Core data models for the track library.
//!
//! Defines the primary entity [`Track`] and the small value types that travel
//! with it: [`TrackId`], [`TrackDraft`] (an analysed track that has not been
//! given an id yet), [`TrackField`] (an editable column) and [`Suggestion`]
//! (a recommender pointer back into the library).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Stable, opaque track identifier.
///
/// Derived from the source file name and never changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an id from a file identifier (a path or a bare file name).
    ///
    /// Only the file-name component is kept, so `/music/a.mp3` and `a.mp3`
    /// identify the same track.
    pub fn from_source(source: &str) -> Self {
        let name = Path::new(source)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(source);
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A track in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Immutable identifier (source file name)
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    /// Camelot notation, e.g. "8A"
    pub key: String,
    /// Tempo in beats per minute (positive)
    pub bpm: f64,
    /// Energy level 1-10
    pub energy: u8,
}

impl Track {
    /// Text rendering of a single field, as shown in a table cell.
    pub fn field_text(&self, field: TrackField) -> String {
        match field {
            TrackField::Title => self.title.clone(),
            TrackField::Artist => self.artist.clone(),
            TrackField::Key => self.key.clone(),
            TrackField::Bpm => format_bpm(self.bpm),
            TrackField::Energy => self.energy.to_string(),
        }
    }

    /// Whether a suggestion points at this track.
    pub fn matches(&self, suggestion: &Suggestion) -> bool {
        self.title == suggestion.title && self.artist == suggestion.artist
    }
}

/// An analysed track that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDraft {
    pub title: String,
    pub artist: String,
    pub key: String,
    pub bpm: f64,
    pub energy: u8,
}

impl TrackDraft {
    pub fn into_track(self, id: TrackId) -> Track {
        Track {
            id,
            title: self.title,
            artist: self.artist,
            key: self.key,
            bpm: self.bpm,
            energy: self.energy,
        }
    }
}

/// An editable track column. The id is deliberately not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackField {
    Title,
    Artist,
    Key,
    Bpm,
    Energy,
}

impl TrackField {
    pub const ALL: [TrackField; 5] = [
        TrackField::Title,
        TrackField::Artist,
        TrackField::Key,
        TrackField::Bpm,
        TrackField::Energy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackField::Title => "title",
            TrackField::Artist => "artist",
            TrackField::Key => "key",
            TrackField::Bpm => "bpm",
            TrackField::Energy => "energy",
        }
    }

    /// Fields that feed harmonic-mixing decisions. Editing one of these on
    /// the selected track invalidates its suggestions.
    pub fn affects_harmony(self) -> bool {
        matches!(self, TrackField::Key | TrackField::Bpm | TrackField::Energy)
    }
}

impl fmt::Display for TrackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown track field '{0}' (expected title, artist, key, bpm or energy)")]
pub struct UnknownFieldError(pub String);

impl FromStr for TrackField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(TrackField::Title),
            "artist" => Ok(TrackField::Artist),
            "key" => Ok(TrackField::Key),
            "bpm" => Ok(TrackField::Bpm),
            "energy" => Ok(TrackField::Energy),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// A recommender's pointer to a library track, by (title, artist).
///
/// Not authoritative: resolution can fail if the track was edited after the
/// suggestion was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub artist: String,
    /// Free-text rationale from the recommender
    pub reason: String,
}

/// Format a BPM value the way it is displayed and exported: integral values
/// without a fractional part (`124`), others as-is (`122.5`).
pub fn format_bpm(bpm: f64) -> String {
    format!("{}", bpm)
}
