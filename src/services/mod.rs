//! External collaborators: track analysis and next-track recommendation.
//!
//! # Architecture
//!
//! Same split as any API integration in this crate:
//! - **Domain** (`domain.rs`) - error types and payload validation
//! - **Traits** (`traits.rs`) - the [`Analyzer`] / [`Recommender`] seams the
//!   session runtime depends on, plus test mocks
//! - **Gemini** (`gemini/`) - DTOs, adapter and HTTP client for the hosted model
//! - **Local** (`local.rs`) - rule-based offline recommender
//!
//! Collaborators are stateless from the session's point of view; they are
//! handed everything they need with each call.

pub mod domain;
pub mod gemini;
pub mod local;
pub mod traits;

pub use domain::{AnalysisError, MAX_SUGGESTIONS, RecommendationError, UNKNOWN_ARTIST};
pub use gemini::{GeminiClient, GeminiConfig};
pub use local::HarmonicRecommender;
pub use traits::{Analyzer, Recommender, Unconfigured};
