//! The performance set-list: an ordered, duplicate-free list of track ids,
//! independent of how the library view is filtered or sorted.

use crate::model::{Track, TrackId};

use super::TrackStore;

#[derive(Debug, Clone, Default)]
pub struct Setlist {
    entries: Vec<TrackId>,
}

impl Setlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track. Returns `false` (and changes nothing) if it is
    /// already in the list.
    pub fn add(&mut self, id: TrackId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Returns `false` if the id was not in the list.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.entries.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.entries
    }

    /// Current library tracks in set-list order. Ids no longer in the store
    /// are skipped.
    pub fn resolve<'a>(&self, store: &'a TrackStore) -> Vec<&'a Track> {
        self.ids().iter().filter_map(|id| store.get(id)).collect()
    }
}
