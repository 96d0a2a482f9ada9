//! In-memory track library.
//!
//! [`TrackStore`] owns the collection. Tracks are appended in insertion
//! order, identified by [`TrackId`], and only ever mutated through
//! [`TrackStore::update`]. Adding an id that already exists is rejected, which
//! is also what makes merging concurrent analysis results safe.

mod demo;
pub mod filter;
pub mod setlist;
pub mod sort;

pub use demo::demo_tracks;
pub use filter::{Bounds, FilterCriteria, InvalidBounds};
pub use setlist::Setlist;
pub use sort::{SortDirection, SortSpec};

use crate::model::{Suggestion, Track, TrackField, TrackId};

/// Rejected add of an id that is already in the library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Track '{0}' is already in the library")]
pub struct DuplicateTrackError(pub TrackId);

/// Rejected inline edit of a numeric field. Recoverable: the old value stays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditValidationError {
    #[error("'{value}' is not a number ({field})")]
    NotANumber { field: TrackField, value: String },

    #[error("{value} is out of range for {field}")]
    OutOfRange { field: TrackField, value: String },
}

/// Result of merging a batch of tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub added: Vec<TrackId>,
    /// Ids rejected because they were already present (or repeated in the batch)
    pub duplicates: Vec<TrackId>,
}

#[derive(Debug, Clone, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks in insertion order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.get(id).is_some()
    }

    /// Append a track unless its id is already present.
    pub fn add(&mut self, track: Track) -> Result<&Track, DuplicateTrackError> {
        if self.contains(&track.id) {
            return Err(DuplicateTrackError(track.id));
        }
        self.tracks.push(track);
        // Just pushed
        Ok(&self.tracks[self.tracks.len() - 1])
    }

    /// Add several tracks; the first occurrence of an id wins, whether the
    /// clash is with the library or within the batch itself.
    pub fn add_batch(&mut self, tracks: impl IntoIterator<Item = Track>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for track in tracks {
            match self.add(track) {
                Ok(added) => outcome.added.push(added.id.clone()),
                Err(DuplicateTrackError(id)) => {
                    tracing::debug!(target: "library", "Ignoring duplicate track {}", id);
                    outcome.duplicates.push(id);
                }
            }
        }
        outcome
    }

    /// Apply an inline edit.
    ///
    /// Text fields store `raw` as-is. Numeric fields are parsed first; a value
    /// that does not parse (or is out of range) leaves the track untouched and
    /// returns an [`EditValidationError`]. Returns `Ok(None)` if `id` is not in
    /// the library.
    pub fn update(
        &mut self,
        id: &TrackId,
        field: TrackField,
        raw: &str,
    ) -> Result<Option<&Track>, EditValidationError> {
        let Some(track) = self.tracks.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };

        match field {
            TrackField::Title => track.title = raw.to_string(),
            TrackField::Artist => track.artist = raw.to_string(),
            TrackField::Key => track.key = raw.to_string(),
            TrackField::Bpm => track.bpm = parse_bpm(raw)?,
            TrackField::Energy => track.energy = parse_energy(raw)?,
        }

        Ok(Some(track))
    }

    /// Filtered-then-sorted view of the library.
    pub fn view(&self, criteria: &FilterCriteria, sort: &SortSpec) -> Vec<&Track> {
        let mut view: Vec<&Track> = self.tracks.iter().filter(|t| criteria.matches(t)).collect();
        sort.sort(&mut view);
        view
    }

    /// Resolve a suggestion by exact (title, artist). The first match in
    /// insertion order wins; `None` if nothing matches.
    pub fn find_by_suggestion(&self, suggestion: &Suggestion) -> Option<&Track> {
        self.tracks.iter().find(|t| t.matches(suggestion))
    }

    /// Every track except `id`, in insertion order.
    pub fn others(&self, id: &TrackId) -> Vec<Track> {
        self.tracks.iter().filter(|t| &t.id != id).cloned().collect()
    }
}

fn parse_bpm(raw: &str) -> Result<f64, EditValidationError> {
    let bpm: f64 = raw.trim().parse().map_err(|_| EditValidationError::NotANumber {
        field: TrackField::Bpm,
        value: raw.to_string(),
    })?;
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(EditValidationError::OutOfRange {
            field: TrackField::Bpm,
            value: raw.to_string(),
        });
    }
    Ok(bpm)
}

fn parse_energy(raw: &str) -> Result<u8, EditValidationError> {
    let energy: f64 = raw.trim().parse().map_err(|_| EditValidationError::NotANumber {
        field: TrackField::Energy,
        value: raw.to_string(),
    })?;
    if energy.fract() != 0.0 || !(1.0..=10.0).contains(&energy) {
        return Err(EditValidationError::OutOfRange {
            field: TrackField::Energy,
            value: raw.to_string(),
        });
    }
    Ok(energy as u8)
}
