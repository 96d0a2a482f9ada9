//! Collaborator contracts and boundary validation.
//!
//! Analyzer and recommender payloads arrive as loosely-typed JSON. They are
//! deserialized into wire structs, range-checked here and turned into OUR types ([`TrackDraft`],
//! [`Suggestion`]); anything malformed becomes an [`AnalysisError`] or
//! [`RecommendationError`] and never reaches the library.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{Suggestion, TrackDraft};

/// Recommenders return at most this many suggestions.
pub const MAX_SUGGESTIONS: usize = 3;

/// Artist used when the analyzer cannot infer one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Errors from the per-file analyzer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analyzer not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API contract violation: {field} {reason}")]
    ContractViolation { field: &'static str, reason: String },

    /// The worker running the call died before reporting.
    #[error("Worker task failed: {0}")]
    TaskFailed(String),
}

/// Errors from the recommender.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API contract violation: {field} {reason}")]
    ContractViolation { field: &'static str, reason: String },

    /// The worker running the call died before reporting.
    #[error("Worker task failed: {0}")]
    TaskFailed(String),
}

/// Analyzer payload as it comes off the wire, before range checks.
#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    key: String,
    bpm: f64,
    energy: f64,
}

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    title: String,
    artist: String,
    reason: String,
}

/// Non-blank, trimmed text.
fn present(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Validate an analyzer payload for `filename`.
///
/// `key` must be a non-empty string, `bpm` a positive number and `energy` an
/// integer in 1..=10. A blank title falls back to the file name and a blank
/// artist to [`UNKNOWN_ARTIST`].
pub fn validate_analysis(payload: &Value, filename: &str) -> Result<TrackDraft, AnalysisError> {
    let violation = |field: &'static str, reason: String| AnalysisError::ContractViolation { field, reason };

    if !payload.is_object() {
        return Err(violation("payload", "is not a JSON object".to_string()));
    }
    let raw = AnalysisPayload::deserialize(payload).map_err(|e| violation("payload", e.to_string()))?;

    let key = present(Some(raw.key)).ok_or_else(|| violation("key", "is empty".to_string()))?;
    if !raw.bpm.is_finite() || raw.bpm <= 0.0 {
        return Err(violation("bpm", "must be positive".to_string()));
    }
    if raw.energy.fract() != 0.0 || !(1.0..=10.0).contains(&raw.energy) {
        return Err(violation("energy", "must be an integer from 1 to 10".to_string()));
    }

    Ok(TrackDraft {
        title: present(raw.title).unwrap_or_else(|| filename.to_string()),
        artist: present(raw.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        key,
        bpm: raw.bpm,
        energy: raw.energy as u8,
    })
}

/// Validate a recommender payload: an array of `{title, artist, reason}`
/// objects. Only the first [`MAX_SUGGESTIONS`] entries are kept; entries past
/// that are not inspected.
pub fn validate_suggestions(payload: &Value) -> Result<Vec<Suggestion>, RecommendationError> {
    let violation = |field: &'static str, reason: String| RecommendationError::ContractViolation { field, reason };

    let items = Vec::<Value>::deserialize(payload).map_err(|e| violation("payload", e.to_string()))?;

    items
        .iter()
        .take(MAX_SUGGESTIONS)
        .enumerate()
        .map(|(i, item)| {
            let raw = SuggestionPayload::deserialize(item)
                .map_err(|e| violation("suggestion", format!("{} is malformed: {e}", i + 1)))?;
            Ok(Suggestion {
                title: raw.title,
                artist: raw.artist,
                reason: raw.reason,
            })
        })
        .collect()
}
