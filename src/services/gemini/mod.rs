//! Google Gemini integration
//!
//! Analyzes tracks from their file names and suggests follow-up tracks, both
//! through `generateContent` with a JSON response schema.
//!
//! API docs: https://ai.google.dev/api/generate-content

pub mod dto;
mod adapter;
mod client;
mod prompt;

pub use client::{DEFAULT_BASE_URL, GeminiClient, GeminiConfig};
