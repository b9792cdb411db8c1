//! Wire types for `models/{model}:generateContent`.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Finish reason reported when a candidate was withheld by safety filters.
const SAFETY_FINISH_REASON: &str = "SAFETY";

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// A single-turn text prompt.
    pub fn text(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with all its text parts concatenated.
    ///
    /// Failure is decided from the typed fields: a prompt block reason, a
    /// safety finish reason, or a candidate without any text.
    pub fn into_text(self) -> Result<String, GenerationError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerationError::Blocked(reason));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::EmptyResponse("NO_CANDIDATES".into()))?;

        let text: String = candidate
            .content
            .into_iter()
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "UNSPECIFIED".to_string());
        if reason == SAFETY_FINISH_REASON {
            Err(GenerationError::Blocked(reason))
        } else {
            Err(GenerationError::EmptyResponse(reason))
        }
    }
}
