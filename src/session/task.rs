//! Side effects requested by update handlers.
//!
//! [`update`](super::update) never performs I/O itself. It returns a
//! [`Task`] describing the collaborator call to make, and the
//! [`Controller`](super::Controller) runs it and feeds the completion back in
//! as a [`Message`](super::Message).

use crate::model::Track;

/// Monotonic recommendation request counter.
///
/// Every selection change or invalidating edit moves to a new epoch; a
/// completion tagged with an older epoch is stale and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestEpoch(u64);

impl RequestEpoch {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Identifies one add-files batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

impl BatchId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    None,
    /// Analyze `files`; the results come back as one `AnalysisFinished`
    Analyze { batch: BatchId, files: Vec<String> },
    /// Ask the recommender about `current`; answers with `SuggestionsReceived`
    Recommend {
        epoch: RequestEpoch,
        current: Track,
        candidates: Vec<Track>,
    },
}

impl Task {
    pub fn none() -> Self {
        Task::None
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Task::None)
    }
}
