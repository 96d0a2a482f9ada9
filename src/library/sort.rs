//! Library sort order.

use std::cmp::Ordering;

use crate::model::{Track, TrackField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The single active sort column and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: TrackField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: TrackField::Artist,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortSpec {
    pub fn new(field: TrackField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header-click semantics: the same column ascending flips to descending,
    /// anything else sorts ascending.
    pub fn toggle(self, field: TrackField) -> Self {
        let direction = if self.field == field {
            self.direction.toggled()
        } else {
            SortDirection::Ascending
        };
        Self { field, direction }
    }

    pub fn compare(&self, a: &Track, b: &Track) -> Ordering {
        let ordering = compare_field(self.field, a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Stable sort: ties keep their relative order in either direction.
    pub fn sort(&self, tracks: &mut [&Track]) {
        tracks.sort_by(|a, b| self.compare(a, b));
    }
}

/// Raw value order: text compares exactly as stored (case-sensitive, so
/// `"Zed" < "apple"` and `"10A" < "8A"`), numbers numerically.
fn compare_field(field: TrackField, a: &Track, b: &Track) -> Ordering {
    match field {
        TrackField::Title => a.title.cmp(&b.title),
        TrackField::Artist => a.artist.cmp(&b.artist),
        TrackField::Key => a.key.cmp(&b.key),
        TrackField::Bpm => a.bpm.total_cmp(&b.bpm),
        TrackField::Energy => a.energy.cmp(&b.energy),
    }
}
