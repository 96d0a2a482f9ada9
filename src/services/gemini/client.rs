//! Gemini HTTP client
//!
//! Calls `models/{model}:generateContent` on the Generative Language API with
//! a JSON response schema, then hands the answer to the adapter.
//!
//! ## Request spacing
//! Free-tier keys are rate limited per minute. Setting
//! `min_request_interval` spaces out request starts across all concurrent
//! callers of one client; the default of zero disables spacing.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::{adapter, dto, prompt};
use crate::model::{Suggestion, Track, TrackDraft};
use crate::services::domain::{AnalysisError, RecommendationError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client settings, usually built from the `[services]` config section.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model used for per-file analysis
    pub analysis_model: String,
    /// Model used for next-track suggestions
    pub recommendation_model: String,
    pub request_timeout: Duration,
    pub min_request_interval: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            recommendation_model: "gemini-2.5-pro".to_string(),
            request_timeout: Duration::from_secs(60),
            min_request_interval: Duration::ZERO,
        }
    }
}

/// Transport-level failure, before it is attributed to analysis or
/// recommendation.
#[derive(Debug)]
enum CallError {
    Network(String),
    Api(String),
    Parse(String),
}

impl From<CallError> for AnalysisError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Network(m) => AnalysisError::Network(m),
            CallError::Api(m) => AnalysisError::Api(m),
            CallError::Parse(m) => AnalysisError::Parse(m),
        }
    }
}

impl From<CallError> for RecommendationError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Network(m) => RecommendationError::Network(m),
            CallError::Api(m) => RecommendationError::Api(m),
            CallError::Parse(m) => RecommendationError::Parse(m),
        }
    }
}

/// Hands out request start times at least `min_interval` apart.
struct RequestSpacing {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestSpacing {
    fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let start = {
            let mut next = self.next_slot.lock();
            let now = Instant::now();
            let start = next.map_or(now, |slot| slot.max(now));
            *next = Some(start + self.min_interval);
            start
        };
        tokio::time::sleep_until(start).await;
    }
}

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
    analysis_model: String,
    recommendation_model: String,
    spacing: RequestSpacing,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_key: config.api_key,
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            analysis_model: config.analysis_model,
            recommendation_model: config.recommendation_model,
            spacing: RequestSpacing::new(config.min_request_interval),
        })
    }

    /// Infer track metadata from a file name.
    pub async fn analyze_file(&self, filename: &str) -> Result<TrackDraft, AnalysisError> {
        let request = dto::GenerateContentRequest::json(prompt::analysis_prompt(filename), prompt::analysis_schema());
        let response = self.generate(&self.analysis_model, &request).await?;
        adapter::to_track_draft(response, filename)
    }

    /// Suggest follow-up tracks for `current` out of `candidates`.
    pub async fn suggest_next(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<Vec<Suggestion>, RecommendationError> {
        let request = dto::GenerateContentRequest::json(
            prompt::recommendation_prompt(current, candidates),
            prompt::recommendation_schema(),
        );
        let response = self.generate(&self.recommendation_model, &request).await?;
        adapter::to_suggestions(response)
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            model,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Send the HTTP request and parse the response
    async fn generate(
        &self,
        model: &str,
        request: &dto::GenerateContentRequest,
    ) -> Result<dto::GenerateContentResponse, CallError> {
        self.spacing.wait_turn().await;
        tracing::debug!(target: "services::gemini", model, "Sending generateContent request");

        let response = self
            .http_client
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallError::Network(format!("request to {model} timed out"))
                } else {
                    // Strip the URL so the key never ends up in an error message
                    CallError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ErrorResponse>().await {
                let status_name = error.error.status.unwrap_or_else(|| status.to_string());
                return Err(CallError::Api(format!("{}: {}", status_name, error.error.message)));
            }
            return Err(CallError::Api(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::GenerateContentResponse>()
            .await
            .map_err(|e| CallError::Parse(e.without_url().to_string()))
    }
}
