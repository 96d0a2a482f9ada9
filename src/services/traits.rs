//! Collaborator traits.
//!
//! The session runtime only ever sees `Arc<dyn Analyzer>` and
//! `Arc<dyn Recommender>`, so the Gemini client, the offline recommender and
//! the test mocks are interchangeable.

use async_trait::async_trait;

use super::domain::{AnalysisError, RecommendationError};
use crate::model::{Suggestion, Track, TrackDraft};

/// Infers title, artist, key, BPM and energy for a file identifier.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, filename: &str) -> Result<TrackDraft, AnalysisError>;
}

/// Proposes up to three follow-up tracks for `current`, chosen from
/// `candidates` (the library without `current`).
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<Vec<Suggestion>, RecommendationError>;
}

// Implement traits for real clients

#[async_trait]
impl Analyzer for super::gemini::GeminiClient {
    async fn analyze(&self, filename: &str) -> Result<TrackDraft, AnalysisError> {
        self.analyze_file(filename).await
    }
}

#[async_trait]
impl Recommender for super::gemini::GeminiClient {
    async fn recommend(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<Vec<Suggestion>, RecommendationError> {
        self.suggest_next(current, candidates).await
    }
}

/// Stand-in analyzer used when no API key is configured. Every call fails
/// with [`AnalysisError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct Unconfigured {
    reason: String,
}

impl Unconfigured {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Analyzer for Unconfigured {
    async fn analyze(&self, _filename: &str) -> Result<TrackDraft, AnalysisError> {
        Err(AnalysisError::NotConfigured(self.reason.clone()))
    }
}
