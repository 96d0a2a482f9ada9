//! Update handlers for session messages.
//!
//! Split by concern:
//! - `import`: add-files batches and seeding
//! - `selection`: selection, suggestion resolution and stale-result handling
//! - `edit`: the inline-edit state machine
//! - `search`: filter and sort
//! - `setlist`: set-list membership

mod edit;
mod import;
mod search;
mod selection;
mod setlist;

pub use edit::handle_edit;
pub use import::handle_import;
pub use search::handle_search_filter;
pub use selection::handle_selection;
pub use setlist::handle_setlist;

use super::messages::Message;
use super::state::SessionState;
use super::task::Task;

/// Apply `message` to the state and return the side effects to run.
pub fn update(s: &mut SessionState, message: Message) -> Task {
    match message {
        m @ (Message::AddFiles(_) | Message::AnalysisFinished { .. } | Message::SeedTracks(_)) => {
            handle_import(s, m)
        }
        m @ (Message::SelectTrack(_) | Message::SelectSuggestion(_) | Message::SuggestionsReceived { .. }) => {
            handle_selection(s, m)
        }
        m @ (Message::StartEdit { .. } | Message::CommitEdit(_) | Message::CancelEdit) => handle_edit(s, m),
        m @ (Message::SetFilter(_) | Message::ResetFilter | Message::SetSort(_)) => handle_search_filter(s, m),
        m @ (Message::AddToSetlist(_) | Message::RemoveFromSetlist(_)) => handle_setlist(s, m),
        Message::DismissError => {
            s.error = None;
            Task::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Bounds, FilterCriteria, SortDirection};
    use crate::model::{Suggestion, TrackField, TrackId};
    use crate::services::{AnalysisError, RecommendationError};
    use crate::session::messages::FileAnalysis;
    use crate::session::state::{ExportView, Recommendations, SessionOptions};
    use crate::session::task::RequestEpoch;
    use crate::test_utils::{draft, suggestion_for, track};

    fn id(s: &str) -> TrackId {
        TrackId::new(s)
    }

    /// T1(a, 8A, 120, 5) and T2(b, 9A, 124, 6)
    fn two_track_session() -> SessionState {
        let mut s = SessionState::default();
        update(
            &mut s,
            Message::SeedTracks(vec![track("a", "8A", 120.0, 5), track("b", "9A", 124.0, 6)]),
        );
        s
    }

    fn recommend_epoch(task: &Task) -> RequestEpoch {
        match task {
            Task::Recommend { epoch, .. } => *epoch,
            other => panic!("expected a recommend task, got {other:?}"),
        }
    }

    fn start_edit(s: &mut SessionState, track: &str, field: TrackField) -> Task {
        update(
            s,
            Message::StartEdit {
                track_id: id(track),
                field,
            },
        )
    }

    // ========================================================================
    // Selection & recommendations
    // ========================================================================

    #[test]
    fn test_select_requests_recommendations_for_the_rest() {
        let mut s = two_track_session();
        let task = update(&mut s, Message::SelectTrack(id("a")));

        match task {
            Task::Recommend { current, candidates, .. } => {
                assert_eq!(current.id, id("a"));
                assert_eq!(candidates.iter().map(|t| t.id.clone()).collect::<Vec<_>>(), vec![id("b")]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(s.is_suggesting());
        assert!(s.suggestions().is_empty());
    }

    #[test]
    fn test_suggestion_resolves_back_to_track() {
        let mut s = two_track_session();
        let epoch = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));

        let reply = Suggestion {
            reason: "adjacent key".to_string(),
            ..suggestion_for("b")
        };
        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch,
                result: Ok(vec![reply.clone()]),
            },
        );
        assert_eq!(s.suggestions().len(), 1);
        assert_eq!(s.suggestions()[0].track_id, Some(id("b")));
        assert!(!s.suggestions()[0].is_flagged());

        let task = update(&mut s, Message::SelectSuggestion(reply));
        assert_eq!(s.selection, Some(id("b")));
        assert!(matches!(task, Task::Recommend { .. }));
    }

    #[test]
    fn test_unresolvable_suggestion_is_a_no_op() {
        let mut s = two_track_session();
        update(&mut s, Message::SelectTrack(id("a")));

        let task = update(&mut s, Message::SelectSuggestion(suggestion_for("zz")));
        assert!(task.is_none());
        assert_eq!(s.selection, Some(id("a")));
    }

    #[test]
    fn test_single_track_library_skips_recommender() {
        let mut s = SessionState::default();
        update(&mut s, Message::SeedTracks(vec![track("a", "8A", 120.0, 5)]));

        let task = update(&mut s, Message::SelectTrack(id("a")));
        assert!(task.is_none());
        assert_eq!(s.recommendations, Recommendations::Ready(vec![]));
        assert!(!s.is_suggesting());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut s = two_track_session();
        let first = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));
        let second = recommend_epoch(&update(&mut s, Message::SelectTrack(id("b"))));
        assert_ne!(first, second);

        // T2's answer arrives first and is applied
        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch: second,
                result: Ok(vec![suggestion_for("a")]),
            },
        );
        // T1's late answer is ignored
        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch: first,
                result: Ok(vec![suggestion_for("b")]),
            },
        );

        assert_eq!(s.selection, Some(id("b")));
        assert_eq!(s.suggestions().len(), 1);
        assert_eq!(s.suggestions()[0].track_id, Some(id("a")));
    }

    #[test]
    fn test_stale_error_is_discarded_too() {
        let mut s = two_track_session();
        let first = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));
        update(&mut s, Message::SelectTrack(id("b")));

        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch: first,
                result: Err(RecommendationError::Network("reset".to_string())),
            },
        );
        assert!(s.error.is_none());
        assert!(s.is_suggesting());
    }

    #[test]
    fn test_recommendation_failure_surfaces_error() {
        let mut s = two_track_session();
        let epoch = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));

        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch,
                result: Err(RecommendationError::Api("quota exceeded".to_string())),
            },
        );
        assert!(s.suggestions().is_empty());
        assert!(!s.is_suggesting());
        assert_eq!(s.selection, Some(id("a")));
        assert!(s.error.as_deref().unwrap().contains("quota exceeded"));

        update(&mut s, Message::DismissError);
        assert!(s.error.is_none());
    }

    #[test]
    fn test_rule_breaking_suggestions_are_kept_and_flagged() {
        let mut s = SessionState::default();
        update(
            &mut s,
            Message::SeedTracks(vec![track("a", "8A", 120.0, 5), track("c", "3B", 140.0, 10)]),
        );
        let epoch = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));
        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch,
                result: Ok(vec![suggestion_for("c"), suggestion_for("ghost")]),
            },
        );

        let suggestions = s.suggestions();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].is_flagged());
        assert_eq!(suggestions[1].track_id, None);
    }

    #[test]
    fn test_accepted_suggestions_capped_and_reranked() {
        let mut s = SessionState::new(SessionOptions {
            max_suggestions: 2,
            rerank_by_harmony: true,
        });
        update(
            &mut s,
            Message::SeedTracks(vec![
                track("a", "8A", 124.0, 7),
                track("clash", "2B", 124.0, 7),
                track("exact", "8A", 124.0, 7),
                track("extra", "8A", 124.0, 7),
            ]),
        );
        let epoch = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));
        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch,
                result: Ok(vec![suggestion_for("clash"), suggestion_for("exact"), suggestion_for("extra")]),
            },
        );

        let ids: Vec<_> = s.suggestions().iter().map(|a| a.track_id.clone().unwrap()).collect();
        assert_eq!(ids, vec![id("exact"), id("clash")]);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    #[test]
    fn test_invalid_numeric_commit_is_silent_cancel() {
        let mut s = two_track_session();
        start_edit(&mut s, "a", TrackField::Bpm);

        let task = update(&mut s, Message::CommitEdit("fast".to_string()));
        assert!(task.is_none());
        assert!(!s.edit.is_editing());
        assert!(s.error.is_none());
        assert_eq!(s.library.get(&id("a")).unwrap().bpm, 120.0);
    }

    #[test]
    fn test_harmonic_edit_on_selected_track_refreshes_once() {
        let mut s = two_track_session();
        let old = recommend_epoch(&update(&mut s, Message::SelectTrack(id("a"))));
        update(
            &mut s,
            Message::SuggestionsReceived {
                epoch: old,
                result: Ok(vec![suggestion_for("b")]),
            },
        );

        start_edit(&mut s, "a", TrackField::Key);
        let task = update(&mut s, Message::CommitEdit("9A".to_string()));

        let new = recommend_epoch(&task);
        assert!(new > old);
        assert!(s.suggestions().is_empty());
        assert!(s.is_suggesting());
        match &task {
            Task::Recommend { current, .. } => assert_eq!(current.key, "9A"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_non_harmonic_or_unselected_edit_does_not_refresh() {
        let mut s = two_track_session();
        update(&mut s, Message::SelectTrack(id("a")));

        start_edit(&mut s, "a", TrackField::Title);
        assert!(update(&mut s, Message::CommitEdit("Renamed".to_string())).is_none());

        start_edit(&mut s, "b", TrackField::Bpm);
        assert!(update(&mut s, Message::CommitEdit("126".to_string())).is_none());
        assert_eq!(s.library.get(&id("b")).unwrap().bpm, 126.0);
    }

    #[test]
    fn test_unchanged_commit_does_not_refresh() {
        let mut s = two_track_session();
        update(&mut s, Message::SelectTrack(id("a")));
        start_edit(&mut s, "a", TrackField::Energy);

        assert!(update(&mut s, Message::CommitEdit("5".to_string())).is_none());
        assert!(!s.edit.is_editing());
    }

    #[test]
    fn test_edit_blocks_other_edits_and_selection() {
        let mut s = two_track_session();
        update(&mut s, Message::SelectTrack(id("a")));
        start_edit(&mut s, "a", TrackField::Bpm);

        start_edit(&mut s, "b", TrackField::Key);
        assert_eq!(s.edit.target().unwrap().track_id, id("a"));

        assert!(update(&mut s, Message::SelectTrack(id("b"))).is_none());
        assert_eq!(s.selection, Some(id("a")));

        update(&mut s, Message::CancelEdit);
        assert!(!s.edit.is_editing());
        assert_eq!(s.library.get(&id("a")).unwrap().bpm, 120.0);
        assert!(matches!(update(&mut s, Message::SelectTrack(id("b"))), Task::Recommend { .. }));
    }

    #[test]
    fn test_edit_of_unknown_track_is_ignored() {
        let mut s = two_track_session();
        start_edit(&mut s, "zz", TrackField::Title);
        assert!(!s.edit.is_editing());
    }

    // ========================================================================
    // Import
    // ========================================================================

    #[test]
    fn test_add_files_skips_known_and_repeated_ids() {
        let mut s = two_track_session();
        let task = update(
            &mut s,
            Message::AddFiles(vec![
                "/music/a".to_string(),
                "c.mp3".to_string(),
                "/other/c.mp3".to_string(),
                "d.mp3".to_string(),
            ]),
        );

        match task {
            Task::Analyze { files, .. } => assert_eq!(files, vec!["c.mp3", "d.mp3"]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(s.is_analyzing());
        assert!(update(&mut s, Message::AddFiles(vec!["a".to_string()])).is_none());
    }

    #[test]
    fn test_batch_failures_aggregate_but_successes_are_added() {
        let mut s = SessionState::default();
        let batch = match update(
            &mut s,
            Message::AddFiles(vec!["x.mp3".into(), "y.mp3".into(), "z.mp3".into()]),
        ) {
            Task::Analyze { batch, .. } => batch,
            other => panic!("unexpected {other:?}"),
        };

        update(
            &mut s,
            Message::AnalysisFinished {
                batch,
                outcomes: vec![
                    FileAnalysis {
                        source: "x.mp3".into(),
                        result: Ok(draft("x", "8A", 124.0, 7)),
                    },
                    FileAnalysis {
                        source: "y.mp3".into(),
                        result: Err(AnalysisError::Network("timeout".into())),
                    },
                    FileAnalysis {
                        source: "z.mp3".into(),
                        result: Err(AnalysisError::ContractViolation {
                            field: "energy",
                            reason: "must be an integer from 1 to 10".into(),
                        }),
                    },
                ],
            },
        );

        assert!(!s.is_analyzing());
        assert_eq!(s.library.len(), 1);
        assert_eq!(s.library.tracks()[0].id, id("x.mp3"));
        let error = s.error.clone().unwrap();
        assert!(error.contains("2 of 3"), "{error}");
        assert!(error.contains("y.mp3") && error.contains("z.mp3"), "{error}");
    }

    #[test]
    fn test_concurrent_batches_merge_without_duplicates() {
        let mut s = SessionState::default();
        // Both batches are issued before either completes
        let Task::Analyze { batch: first, .. } = update(&mut s, Message::AddFiles(vec!["a.mp3".into()])) else {
            panic!("expected an analyze task");
        };
        let Task::Analyze { batch: second, .. } = update(&mut s, Message::AddFiles(vec!["/x/a.mp3".into()])) else {
            panic!("expected an analyze task");
        };
        assert_ne!(first, second);
        assert_eq!(s.analyzing, 2);

        let outcome = |source: &str, key: &str| FileAnalysis {
            source: source.into(),
            result: Ok(draft("a", key, 120.0, 5)),
        };
        update(&mut s, Message::AnalysisFinished { batch: first, outcomes: vec![outcome("a.mp3", "8A")] });
        update(&mut s, Message::AnalysisFinished { batch: second, outcomes: vec![outcome("/x/a.mp3", "1B")] });

        assert!(!s.is_analyzing());
        assert!(s.error.is_none());
        assert_eq!(s.library.len(), 1);
        assert_eq!(s.library.tracks()[0].key, "8A");
    }

    #[test]
    fn test_new_batch_clears_previous_error() {
        let mut s = SessionState {
            error: Some("old".to_string()),
            ..Default::default()
        };
        update(&mut s, Message::AddFiles(vec!["n.mp3".into()]));
        assert!(s.error.is_none());
    }

    // ========================================================================
    // Filter, sort, setlist, export
    // ========================================================================

    #[test]
    fn test_sort_toggles_on_repeat() {
        let mut s = two_track_session();
        update(&mut s, Message::SetSort(TrackField::Bpm));
        assert_eq!(s.sort.direction, SortDirection::Ascending);
        update(&mut s, Message::SetSort(TrackField::Bpm));
        assert_eq!(s.sort.direction, SortDirection::Descending);

        let ids: Vec<_> = s.view().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![id("b"), id("a")]);

        update(&mut s, Message::SetSort(TrackField::Key));
        assert_eq!(s.sort.field, TrackField::Key);
        assert_eq!(s.sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_filter_and_reset() {
        let mut s = two_track_session();
        update(
            &mut s,
            Message::SetFilter(FilterCriteria {
                key: "9a".to_string(),
                energy: Bounds::new(Some(6), None),
                ..Default::default()
            }),
        );
        assert_eq!(s.view().len(), 1);

        update(&mut s, Message::ResetFilter);
        assert_eq!(s.view().len(), 2);
    }

    #[test]
    fn test_setlist_add_twice_keeps_one() {
        let mut s = two_track_session();
        update(&mut s, Message::AddToSetlist(id("b")));
        update(&mut s, Message::AddToSetlist(id("b")));
        assert_eq!(s.setlist.len(), 1);
        assert!(s.in_setlist(&id("b")));

        update(&mut s, Message::AddToSetlist(id("zz")));
        assert_eq!(s.setlist.len(), 1);

        update(&mut s, Message::RemoveFromSetlist(id("b")));
        update(&mut s, Message::RemoveFromSetlist(id("b")));
        assert!(s.setlist.is_empty());
    }

    #[test]
    fn test_export_views() {
        let mut s = two_track_session();
        update(&mut s, Message::AddToSetlist(id("b")));
        update(&mut s, Message::AddToSetlist(id("a")));
        update(&mut s, Message::SetSort(TrackField::Bpm));

        let library = s.export(ExportView::Library).unwrap();
        assert_eq!(
            library,
            "Filename,Title,Artist,Key,BPM,Energy\na,Track a,Artist a,8A,120,5\nb,Track b,Artist b,9A,124,6"
        );

        // Set-list order is independent of the view, and reflects edits
        start_edit(&mut s, "b", TrackField::Title);
        update(&mut s, Message::CommitEdit("Lunar, \"Phases\"".to_string()));
        let setlist = s.export(ExportView::Setlist).unwrap();
        let rows: Vec<_> = setlist.lines().skip(1).collect();
        assert_eq!(rows[0], "b,\"Lunar, \"\"Phases\"\"\",Artist b,9A,124,6");
        assert!(rows[1].starts_with("a,"));
    }

    #[test]
    fn test_export_rows_count_tracks_not_lines() {
        let mut s = two_track_session();
        update(&mut s, Message::AddToSetlist(id("a")));
        start_edit(&mut s, "a", TrackField::Title);
        update(&mut s, Message::CommitEdit("two\nlines".to_string()));

        let csv = s.export(ExportView::Setlist).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(s.export_rows(ExportView::Setlist).len(), 1);
        assert_eq!(s.export_rows(ExportView::Library).len(), 2);
    }
}
