//! Generative service contract: the seam between the controller and
//! whatever actually cooks the prompt.
//!
//! `GeminiService` (gemini.rs) is the production implementation; tests
//! drive the controller with fakes.

use crate::error::{CookerError, Result};
use crate::types::TuningOptions;
use serde::Serialize;
use std::future::Future;

use super::prompts;

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

pub const SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    top_p: 0.95,
    top_k: 64,
};

/// Everything one generation sends over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The user's raw idea, sent as the task body.
    pub task: String,
    /// Built from the tuning options, sent as the system-level directive.
    pub system_instruction: String,
    pub sampling: Sampling,
}

impl GenerationRequest {
    pub fn new(user_input: &str, options: &TuningOptions) -> Self {
        Self {
            task: user_input.to_string(),
            system_instruction: prompts::build_instruction(options),
            sampling: SAMPLING,
        }
    }
}

/// Something that turns a raw idea plus options into a finished prompt.
///
/// One call means exactly one outbound request: no retries, no caching.
pub trait GenerativeService: Send + Sync {
    fn generate(
        &self,
        user_input: &str,
        options: &TuningOptions,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Trim the service's text; blank output is `EmptyGeneration`.
pub fn finish_output(raw: &str) -> Result<String> {
    let cooked = raw.trim();
    if cooked.is_empty() {
        log::warn!("[LLM] Service returned blank text");
        return Err(CookerError::EmptyGeneration);
    }
    Ok(cooked.to_string())
}
