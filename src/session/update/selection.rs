//! Selection and recommendation handling.
//!
//! Every request bumps the session epoch. A completion is applied only while
//! the session is still waiting for exactly that epoch; anything else is a
//! stale answer and is dropped.

use super::super::messages::Message;
use super::super::state::{Recommendations, SessionState};
use super::super::task::Task;
use crate::harmony;
use crate::model::TrackId;

/// Handle selection-related messages.
pub fn handle_selection(s: &mut SessionState, message: Message) -> Task {
    match message {
        Message::SelectTrack(id) => return select_track(s, id),

        Message::SelectSuggestion(suggestion) => {
            match s.library.find_by_suggestion(&suggestion).map(|t| t.id.clone()) {
                Some(id) => return select_track(s, id),
                None => {
                    tracing::debug!(
                        target: "session::selection",
                        "Suggestion \"{}\" by {} no longer matches a track",
                        suggestion.title,
                        suggestion.artist
                    );
                }
            }
        }

        Message::SuggestionsReceived { epoch, result } => {
            if !s.recommendations.awaits(epoch) {
                tracing::debug!(target: "session::selection", "Discarding stale suggestions for {:?}", epoch);
                return Task::none();
            }

            match result {
                Ok(mut suggestions) => {
                    suggestions.truncate(s.options.max_suggestions);
                    let mut annotated = match s.current_track() {
                        Some(current) => harmony::annotate(current, suggestions, s.library.tracks()),
                        None => Vec::new(),
                    };
                    if s.options.rerank_by_harmony {
                        harmony::rerank(&mut annotated);
                    }
                    tracing::debug!(target: "session::selection", "Accepted {} suggestion(s)", annotated.len());
                    s.recommendations = Recommendations::Ready(annotated);
                }
                Err(e) => {
                    tracing::warn!(target: "session::selection", "Recommendation failed: {}", e);
                    s.recommendations = Recommendations::Ready(Vec::new());
                    s.error = Some(format!("Failed to get suggestions: {e}"));
                }
            }
        }

        _ => {}
    }
    Task::none()
}

/// Select `id` and ask for suggestions. Refused while another track has an
/// open edit, or if `id` is unknown.
pub(super) fn select_track(s: &mut SessionState, id: TrackId) -> Task {
    if s.edit.blocks_selection_of(&id) {
        tracing::debug!(target: "session::selection", "Ignoring selection of {} during an edit", id);
        return Task::none();
    }
    if !s.library.contains(&id) {
        tracing::debug!(target: "session::selection", "Ignoring selection of unknown track {}", id);
        return Task::none();
    }

    tracing::debug!(target: "session::selection", "Selected {}", id);
    s.selection = Some(id);
    request_recommendations(s)
}

/// Start a new recommendation request for the current selection, discarding
/// whatever suggestions (or pending request) there were.
pub(super) fn request_recommendations(s: &mut SessionState) -> Task {
    s.epoch = s.epoch.next();

    let Some(current) = s.current_track().cloned() else {
        s.recommendations = Recommendations::Idle;
        return Task::none();
    };

    let candidates = s.library.others(&current.id);
    if candidates.is_empty() {
        s.recommendations = Recommendations::Ready(Vec::new());
        return Task::none();
    }

    s.error = None;
    s.recommendations = Recommendations::Pending(s.epoch);
    Task::Recommend {
        epoch: s.epoch,
        current,
        candidates,
    }
}
