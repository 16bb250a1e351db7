use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

const MAX_OUTPUT_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

/// Reply when the API produced no candidates at all.
pub const NO_CANDIDATES_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Reply when the first candidate carries no content, typically because a
/// safety filter blocked it.
pub const BLOCKED_REPLY: &str = "I'm sorry, I cannot generate a response for that. The content may be inappropriate or violate safety policies.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        };

        // The key travels in the query string; keep it out of error messages.
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| e.without_url())?;

        let generated: GenerateResponse = response.json().await.map_err(|e| e.without_url())?;
        extract_reply(generated)
    }
}

/// Pull the reply text out of a `generateContent` response.
pub fn extract_reply(response: GenerateResponse) -> Result<String, AppError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(NO_CANDIDATES_REPLY.to_string());
    };

    let Some(parts) = candidate.content.and_then(|content| content.parts) else {
        return Ok(BLOCKED_REPLY.to_string());
    };

    let part = parts
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("candidate content has no parts".to_string()))?;

    part.text
        .ok_or_else(|| AppError::Internal("candidate part has no text".to_string()))
}
