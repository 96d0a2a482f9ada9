//! Session state.
//!
//! Everything a presentation layer needs to render lives in one
//! [`SessionState`] owned by the [`Controller`](super::Controller). It is only
//! ever mutated by [`update`](super::update).

use crate::export;
use crate::harmony::AnnotatedSuggestion;
use crate::library::{FilterCriteria, Setlist, SortSpec, TrackStore};
use crate::model::{Track, TrackId};
use crate::services::MAX_SUGGESTIONS;

use super::edit::EditSession;
use super::task::{BatchId, RequestEpoch};

/// Recommendation state for the current selection.
///
/// There is at most one accepted suggestion set, always for the latest
/// request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Recommendations {
    /// Nothing selected
    #[default]
    Idle,
    /// Waiting for the answer to the request issued at this epoch
    Pending(RequestEpoch),
    /// Answer accepted (possibly empty)
    Ready(Vec<AnnotatedSuggestion>),
}

impl Recommendations {
    pub fn suggestions(&self) -> &[AnnotatedSuggestion] {
        match self {
            Recommendations::Ready(suggestions) => suggestions,
            _ => &[],
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Recommendations::Pending(_))
    }

    /// Whether a completion tagged `epoch` should be applied.
    pub fn awaits(&self, epoch: RequestEpoch) -> bool {
        matches!(self, Recommendations::Pending(pending) if *pending == epoch)
    }
}

/// Which sequence to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportView {
    /// The filtered and sorted library
    #[default]
    Library,
    Setlist,
}

/// Tunables applied when accepting suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_suggestions: usize,
    /// Re-order accepted suggestions by harmonic score
    pub rerank_by_harmony: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_suggestions: MAX_SUGGESTIONS,
            rerank_by_harmony: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub library: TrackStore,
    pub filter: FilterCriteria,
    pub sort: SortSpec,
    pub edit: EditSession,
    pub selection: Option<TrackId>,
    /// Epoch of the latest recommendation request
    pub epoch: RequestEpoch,
    pub recommendations: Recommendations,
    pub setlist: Setlist,
    /// Analysis batches in flight
    pub analyzing: usize,
    /// Latest user-visible error, replaced by each new one
    pub error: Option<String>,
    pub options: SessionOptions,
    pub(crate) last_batch: BatchId,
}

impl SessionState {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The filtered and sorted library.
    pub fn view(&self) -> Vec<&Track> {
        self.library.view(&self.filter, &self.sort)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.selection.as_ref().and_then(|id| self.library.get(id))
    }

    pub fn suggestions(&self) -> &[AnnotatedSuggestion] {
        self.recommendations.suggestions()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing > 0
    }

    pub fn is_suggesting(&self) -> bool {
        self.recommendations.is_pending()
    }

    pub fn in_setlist(&self, id: &TrackId) -> bool {
        self.setlist.contains(id)
    }

    /// Set-list entries resolved against the current library.
    pub fn setlist_tracks(&self) -> Vec<&Track> {
        self.setlist.resolve(&self.library)
    }

    /// The tracks an export of `view` contains, in export order.
    pub fn export_rows(&self, view: ExportView) -> Vec<&Track> {
        match view {
            ExportView::Library => self.view(),
            ExportView::Setlist => self.setlist_tracks(),
        }
    }

    pub fn export(&self, view: ExportView) -> crate::error::Result<String> {
        export::to_csv(self.export_rows(view))
    }

    pub(crate) fn next_batch(&mut self) -> BatchId {
        self.last_batch = self.last_batch.next();
        self.last_batch
    }
}
