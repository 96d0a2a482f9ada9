//! Adapter layer: Convert Gemini responses to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! The model's text answer is parsed as JSON and then validated by
//! [`crate::services::domain`].

use serde_json::Value;

use super::dto;
use crate::model::{Suggestion, TrackDraft};
use crate::services::domain::{self, AnalysisError, RecommendationError};

/// Convert a response to an analysed track for `filename`.
pub fn to_track_draft(
    response: dto::GenerateContentResponse,
    filename: &str,
) -> Result<TrackDraft, AnalysisError> {
    let payload = response_json(response).map_err(AnalysisError::Parse)?;
    domain::validate_analysis(&payload, filename)
}

/// Convert a response to at most three suggestions.
pub fn to_suggestions(response: dto::GenerateContentResponse) -> Result<Vec<Suggestion>, RecommendationError> {
    let payload = response_json(response).map_err(RecommendationError::Parse)?;
    domain::validate_suggestions(&payload)
}

/// Concatenated text of the first candidate, parsed as JSON.
fn response_json(response: dto::GenerateContentResponse) -> Result<Value, String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({r})"))
            .unwrap_or_else(|| "response has no candidates".to_string());
        return Err(reason);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let finish = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(format!("empty answer (finish reason {finish})"));
    }

    serde_json::from_str(strip_code_fence(&text)).map_err(|e| format!("{e}: {}", text.trim()))
}

/// Models sometimes wrap JSON in a ```json fence despite the mime type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
