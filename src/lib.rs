//! Prompt Cooker: turn a raw idea plus tuning options into a polished
//! prompt for another AI.
//!
//! This is the crate root that wires the domains together. The binary
//! (main.rs) only calls `run()`.
//!
//! Domains:
//!   - types.rs     : tuning options, shared recipes, history records
//!   - recipe/      : share-token codec and `?recipe=` links
//!   - history/     : the bounded recipe book and its storage backends
//!   - llm/         : instruction builder + Gemini service
//!   - controller.rs: orchestration of generate / load / delete / share
//!   - highlight.rs : `{{emphasis}}` markers in cooked prompts
//!   - cli.rs       : terminal front end

pub mod cli;
pub mod clipboard;
pub mod controller;
pub mod error;
pub mod highlight;
pub mod history;
pub mod llm;
pub mod recipe;
pub mod settings;
pub mod types;

pub use controller::{Controller, StartupReport, ViewState};
pub use error::CookerError;
pub use types::{Format, HistoryItem, Level, SharedRecipe, Tone, TuningOptions};

use clap::Parser;
use std::process::ExitCode;

/// Entry point, called by the binary.
pub fn run() -> ExitCode {
    // Load .env.local → .env from the working directory before anything
    // reads the environment.
    let env_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| settings::load_env_files(&cwd));

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Some(path) = env_file {
        log::info!("[STARTUP] Loaded {}", path.display());
    }

    let cli = cli::Cli::parse();
    let settings = settings::Settings::from_env();
    log::info!("Prompt Cooker starting up");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("[STARTUP] Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(cli::dispatch(cli, settings))
}
