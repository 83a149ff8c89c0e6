use serde::{Deserialize, Serialize};

/// A single text fragment of a content block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text of this part; absent for non-text parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Content block sent to or returned by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`; omitted on requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Sampling configuration; only temperature is sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f64,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation turns; always one user turn here
    pub contents: Vec<Content>,
    /// Sampling settings
    pub generation_config: GenerationConfig,
}

/// One completion candidate
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped, e.g. `STOP`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body from `generateContent`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Generated candidates; only the first is used
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token accounting, when reported
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    pub prompt_token_count: Option<u32>,
    /// Tokens across all candidates
    pub candidates_token_count: Option<u32>,
    /// Prompt plus candidates
    pub total_token_count: Option<u32>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl GenerateRequest {
    /// Build a single-turn request for one prompt
    pub fn new(prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig { temperature },
        }
    }
}

impl GenerateResponse {
    /// Concatenate every text fragment of the first candidate.
    ///
    /// Missing candidates, content or parts all yield an empty string.
    pub fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Extract candidate text from an arbitrary response body.
    ///
    /// Bodies that are not JSON, or JSON of an unexpected shape, yield an empty string.
    pub fn text_from_body(body: &str) -> String {
        serde_json::from_str::<GenerateResponse>(body)
            .map(|r| r.first_candidate_text())
            .unwrap_or_default()
    }
}
