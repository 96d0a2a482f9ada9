//! Message types for the session state engine.
//!
//! Messages are the only way to change a [`SessionState`](super::SessionState).
//! Presentation layers send the request variants; the
//! [`Controller`](super::Controller) sends the completion variants when a
//! collaborator call returns.

use crate::library::FilterCriteria;
use crate::model::{Suggestion, Track, TrackDraft, TrackField, TrackId};
use crate::services::{AnalysisError, RecommendationError};

use super::task::{BatchId, RequestEpoch};

/// Analyzer outcome for one file of a batch.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    /// The identifier passed to add-files
    pub source: String,
    pub result: Result<TrackDraft, AnalysisError>,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Library
    AddFiles(Vec<String>),
    AnalysisFinished {
        batch: BatchId,
        outcomes: Vec<FileAnalysis>,
    },
    /// Add already-analysed tracks directly (CSV seed, demo crate)
    SeedTracks(Vec<Track>),

    // Selection & recommendations
    SelectTrack(TrackId),
    SelectSuggestion(Suggestion),
    SuggestionsReceived {
        epoch: RequestEpoch,
        result: Result<Vec<Suggestion>, RecommendationError>,
    },

    // Inline editing
    StartEdit {
        track_id: TrackId,
        field: TrackField,
    },
    CommitEdit(String),
    CancelEdit,

    // Search & sort
    SetFilter(FilterCriteria),
    ResetFilter,
    SetSort(TrackField),

    // Setlist
    AddToSetlist(TrackId),
    RemoveFromSetlist(TrackId),

    DismissError,
}

impl Message {
    /// Completion of a collaborator call started by a [`Task`](super::Task).
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Message::AnalysisFinished { .. } | Message::SuggestionsReceived { .. }
        )
    }
}
