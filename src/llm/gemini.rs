//! Gemini `generateContent` client: the production `GenerativeService`.
//!
//! One non-streaming request per generation:
//! - API key in the URL query param, read lazily at call time
//! - raw idea as the user turn, built instruction as `systemInstruction`
//! - fixed sampling (temperature 0.7, topP 0.95, topK 64)
//! - text in `candidates[0].content.parts[*].text`
//!
//! Failure mapping:
//! - no key, or the service rejects the key → `MissingCredential`
//! - blank text (including safety-blocked candidates) → `EmptyGeneration`
//! - anything else → `ServiceUnavailable`

use super::provider::{self, GenerationRequest, GenerativeService};
use crate::error::{CookerError, Result};
use crate::settings::Settings;
use crate::types::TuningOptions;
use reqwest::StatusCode;

pub struct GeminiService {
    client: reqwest::Client,
    settings: Settings,
}

impl GeminiService {
    pub fn new(settings: Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model,
            api_key
        )
    }
}

/// Request body for one generation.
pub fn request_body(request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    {
                        "text": request.task
                    }
                ]
            }
        ],
        "systemInstruction": {
            "parts": [
                {
                    "text": request.system_instruction
                }
            ]
        },
        "generationConfig": request.sampling
    })
}

/// Concatenate the text parts of the first candidate.
///
/// A well-formed response with no text (e.g. blocked by safety filters)
/// yields an empty string; a body that is not JSON is an error.
pub fn extract_text(body: &str) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| CookerError::ServiceUnavailable(format!("Invalid response: {}", e)))?;

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        log::warn!("[LLM] Prompt blocked by service: {}", reason);
    }

    let parts = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    Ok(parts
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default())
}

/// Map a non-success HTTP response to an error kind.
pub fn classify_failure(status: StatusCode, body: &str) -> CookerError {
    let key_rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || body.contains("API key")
        || body.contains("API_KEY_INVALID");
    if key_rejected {
        return CookerError::MissingCredential;
    }
    let snippet: String = body.chars().take(200).collect();
    CookerError::ServiceUnavailable(format!("HTTP {}: {}", status, snippet))
}

impl GenerativeService for GeminiService {
    async fn generate(&self, user_input: &str, options: &TuningOptions) -> Result<String> {
        let api_key = match self.settings.resolve_api_key() {
            Some(key) => key,
            None => {
                log::warn!("[LLM] No GEMINI_API_KEY set");
                return Err(CookerError::MissingCredential);
            }
        };

        let request = GenerationRequest::new(user_input, options);

        log::info!("[LLM] Provider: gemini");
        log::info!("[LLM] Model: {}", self.settings.model);
        log::info!(
            "[LLM] Task: {} chars, instruction: {} chars",
            request.task.len(),
            request.system_instruction.len()
        );

        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.endpoint(&api_key))
            .header("content-type", "application/json")
            .json(&request_body(&request))
            .send()
            .await
            .map_err(|e| {
                log::error!("[LLM] HTTP request failed: {}", e);
                CookerError::ServiceUnavailable(e.without_url().to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::error!("[LLM] Failed to read response body: {}", e);
            CookerError::ServiceUnavailable(e.without_url().to_string())
        })?;

        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());

        if !status.is_success() {
            log::error!("[LLM] Gemini API returned {}: {}", status, body);
            return Err(classify_failure(status, &body));
        }

        let text = extract_text(&body)?;
        let cooked = provider::finish_output(&text)?;
        log::info!("[LLM] Cooked prompt: {} chars", cooked.len());
        Ok(cooked)
    }
}
