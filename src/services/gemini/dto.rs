//! Gemini `generateContent` Data Transfer Objects
//!
//! These types match the REST shapes of the Generative Language API.
//! DO NOT use these types outside the gemini module - convert to domain types.
//!
//! API Reference: https://ai.google.dev/api/generate-content

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single user turn asking for JSON matching `schema`.
    pub fn json(prompt: String, schema: serde_json::Value) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            },
        }
    }
}

/// A conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Content part; only text parts are used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

/// Successful response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    /// STOP, MAX_TOKENS, SAFETY, ...
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest::json("hi".to_string(), serde_json::json!({"type": "OBJECT"}));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"key\":\"8A\"}"}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 10}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_parse_error_envelope() {
        let json = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.code, Some(400));
        assert_eq!(response.error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}
