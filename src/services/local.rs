//! Offline recommender driven purely by the harmonic-mixing rules.
//!
//! Used when no API key is configured or `recommendation.offline` is set.

use async_trait::async_trait;

use super::domain::{MAX_SUGGESTIONS, RecommendationError};
use super::traits::Recommender;
use crate::harmony::TransitionAssessment;
use crate::model::{Suggestion, Track};

#[derive(Debug, Clone)]
pub struct HarmonicRecommender {
    max_suggestions: usize,
}

impl Default for HarmonicRecommender {
    fn default() -> Self {
        Self::new(MAX_SUGGESTIONS)
    }
}

impl HarmonicRecommender {
    pub fn new(max_suggestions: usize) -> Self {
        Self {
            max_suggestions: max_suggestions.min(MAX_SUGGESTIONS),
        }
    }

    /// Best-scoring candidates first; ties keep library order.
    pub fn rank(&self, current: &Track, candidates: &[Track]) -> Vec<Suggestion> {
        let mut scored: Vec<(f64, &Track, TransitionAssessment)> = candidates
            .iter()
            .map(|t| {
                let assessment = TransitionAssessment::between(current, t);
                (assessment.score(), t, assessment)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(self.max_suggestions)
            .map(|(_, track, assessment)| Suggestion {
                title: track.title.clone(),
                artist: track.artist.clone(),
                reason: assessment.describe(),
            })
            .collect()
    }
}

#[async_trait]
impl Recommender for HarmonicRecommender {
    async fn recommend(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<Vec<Suggestion>, RecommendationError> {
        Ok(self.rank(current, candidates))
    }
}
