//! Add-files handling: analysis batches and merging their results.

use std::collections::HashSet;

use super::super::messages::{FileAnalysis, Message};
use super::super::state::SessionState;
use super::super::task::Task;
use crate::model::TrackId;
use crate::services::AnalysisError;

/// Handle library import messages.
pub fn handle_import(s: &mut SessionState, message: Message) -> Task {
    match message {
        Message::AddFiles(files) => {
            let mut seen = HashSet::new();
            let requested = files.len();
            let fresh: Vec<String> = files
                .into_iter()
                .filter(|f| {
                    let id = TrackId::from_source(f);
                    !s.library.contains(&id) && seen.insert(id)
                })
                .collect();

            if fresh.len() < requested {
                tracing::debug!(
                    target: "session::import",
                    "Skipping {} file(s) already in the library or repeated",
                    requested - fresh.len()
                );
            }
            if fresh.is_empty() {
                return Task::none();
            }

            s.error = None;
            s.analyzing += 1;
            let batch = s.next_batch();
            tracing::info!(target: "session::import", "Analyzing {} file(s)", fresh.len());
            return Task::Analyze { batch, files: fresh };
        }

        Message::AnalysisFinished { batch, outcomes } => {
            s.analyzing = s.analyzing.saturating_sub(1);
            let attempted = outcomes.len();

            let mut failures = Vec::new();
            let mut tracks = Vec::new();
            for FileAnalysis { source, result } in outcomes {
                match result {
                    Ok(draft) => tracks.push(draft.into_track(TrackId::from_source(&source))),
                    Err(e) => {
                        tracing::warn!(target: "session::import", "Analysis failed for {}: {}", source, e);
                        failures.push((source, e));
                    }
                }
            }

            let merged = s.library.add_batch(tracks);
            tracing::info!(
                target: "session::import",
                "Batch {:?}: added {}, duplicates {}, failed {}",
                batch,
                merged.added.len(),
                merged.duplicates.len(),
                failures.len()
            );

            if !failures.is_empty() {
                s.error = Some(aggregate_error(&failures, attempted));
            }
        }

        Message::SeedTracks(tracks) => {
            let merged = s.library.add_batch(tracks);
            tracing::info!(target: "session::import", "Seeded {} track(s)", merged.added.len());
        }

        _ => {}
    }
    Task::none()
}

/// One message for the whole batch.
fn aggregate_error(failures: &[(String, AnalysisError)], attempted: usize) -> String {
    let details: Vec<String> = failures
        .iter()
        .map(|(source, e)| format!("{source} ({e})"))
        .collect();
    format!(
        "Failed to analyze {} of {} file(s): {}",
        failures.len(),
        attempted,
        details.join("; ")
    )
}
