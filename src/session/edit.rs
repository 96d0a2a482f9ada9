//! Inline-edit state machine.
//!
//! ```text
//! Idle --start(t)--> Editing(t) --commit/cancel--> Idle
//! ```
//!
//! At most one cell is edited at a time. While a cell is being edited,
//! starting an edit on a different cell is refused and so is selecting a
//! different track.

use std::mem;

use crate::model::{TrackField, TrackId};

/// The cell being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub track_id: TrackId,
    pub field: TrackField,
}

impl EditTarget {
    pub fn new(track_id: TrackId, field: TrackField) -> Self {
        Self { track_id, field }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(EditTarget),
}

impl EditSession {
    pub fn target(&self) -> Option<&EditTarget> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(target) => Some(target),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing(_))
    }

    /// Enter `Editing(target)`. Restarting the same cell is allowed; a
    /// different cell while editing is refused and returns `false`.
    pub fn start(&mut self, target: EditTarget) -> bool {
        match self {
            EditSession::Idle => {
                *self = EditSession::Editing(target);
                true
            }
            EditSession::Editing(current) => *current == target,
        }
    }

    /// Leave `Editing`, returning the target. Used for both commit and
    /// cancel; the caller decides whether to apply a value.
    pub fn finish(&mut self) -> Option<EditTarget> {
        match mem::take(self) {
            EditSession::Idle => None,
            EditSession::Editing(target) => Some(target),
        }
    }

    /// Selecting `id` is blocked while a cell of another track is open.
    pub fn blocks_selection_of(&self, id: &TrackId) -> bool {
        matches!(self, EditSession::Editing(target) if &target.track_id != id)
    }
}
