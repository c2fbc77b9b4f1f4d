//! LLM domain: the prompt synthesizer.
//!
//! - prompts.rs : tuning options → system instruction
//! - provider.rs: `GenerativeService` trait, request contract, output checks
//! - gemini.rs  : Google Gemini implementation

pub mod gemini;
pub mod prompts;
pub mod provider;

pub use gemini::GeminiService;
pub use prompts::build_instruction;
pub use provider::{GenerationRequest, GenerativeService};
