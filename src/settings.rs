//! Runtime settings and API key resolution.
//!
//! Everything is environment driven. `load_env_files` pulls `.env.local`
//! (or `.env`) into the process first, then `Settings::from_env` reads:
//!
//! - `GEMINI_API_KEY` (or `API_KEY`, the web build's name)
//! - `PROMPT_COOKER_MODEL`, `PROMPT_COOKER_API_BASE`
//! - `PROMPT_COOKER_SHARE_HOST`, `PROMPT_COOKER_DATA_DIR`
//!
//! A key missing from the environment is looked up in the OS keychain
//! at first use, not at startup.

use crate::error::{CookerError, Result};
use crate::history::storage::default_data_dir;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SHARE_HOST: &str = "promptcooker.app";

/// Keychain entry holding a saved key.
pub const KEYCHAIN_SERVICE: &str = "prompt-cooker";
pub const KEYCHAIN_USER: &str = "gemini";

const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone)]
pub struct Settings {
    pub model: String,
    pub api_base: String,
    pub share_host: String,
    pub data_dir: PathBuf,
    /// Key captured from the environment at startup, if any.
    pub api_key: Option<String>,
    /// Whether to fall back to the OS keychain when `api_key` is unset.
    pub use_keychain: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("share_host", &self.share_host)
            .field("data_dir", &self.data_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("use_keychain", &self.use_keychain)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            share_host: DEFAULT_SHARE_HOST.to_string(),
            data_dir: default_data_dir(),
            api_key: None,
            use_keychain: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let settings = Self {
            model: env_non_empty("PROMPT_COOKER_MODEL").unwrap_or(defaults.model),
            api_base: env_non_empty("PROMPT_COOKER_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            share_host: env_non_empty("PROMPT_COOKER_SHARE_HOST").unwrap_or(defaults.share_host),
            data_dir: env_non_empty("PROMPT_COOKER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            api_key: KEY_VARS.iter().find_map(|name| env_non_empty(name)),
            use_keychain: true,
        };
        log::debug!("[SETTINGS] {:?}", settings);
        settings
    }

    /// The key to use right now: environment first, then keychain.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        if !self.use_keychain {
            return None;
        }
        match keyring::Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_USER).and_then(|e| e.get_password()) {
            Ok(key) if !key.trim().is_empty() => {
                log::info!("[SETTINGS] Loaded Gemini key from OS keychain");
                Some(key)
            }
            Ok(_) => None,
            Err(e) => {
                log::debug!("[SETTINGS] No keychain entry: {}", e);
                None
            }
        }
    }
}

/// Store a Gemini key in the OS keychain for later sessions.
pub fn save_api_key(api_key: &str) -> Result<()> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(CookerError::MissingCredential);
    }
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_USER)
        .map_err(|e| CookerError::Storage(format!("Keyring error: {}", e)))?;
    entry
        .set_password(api_key)
        .map_err(|e| CookerError::Storage(format!("Failed to save key: {}", e)))?;
    log::info!("[SETTINGS] Gemini key saved to OS keychain");
    Ok(())
}

/// Load `.env.local`, falling back to `.env`, from `dir`. First file found wins.
///
/// Runs before the logger exists, so failures go to stderr.
pub fn load_env_files(dir: &Path) -> Option<PathBuf> {
    for env_file in [".env.local", ".env"] {
        let path = dir.join(env_file);
        if !path.exists() {
            continue;
        }
        if let Err(e) = dotenvy::from_path(&path) {
            eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e);
            return None;
        }
        return Some(path);
    }
    None
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let settings = Settings {
            api_key: Some("sk-very-secret".to_string()),
            ..Settings::default()
        };
        let dump = format!("{:?}", settings);
        assert!(!dump.contains("sk-very-secret"));
        assert!(dump.contains("<redacted>"));
    }

    #[test]
    fn explicit_key_wins_without_keychain() {
        let settings = Settings {
            api_key: Some("k".to_string()),
            use_keychain: false,
            ..Settings::default()
        };
        assert_eq!(settings.resolve_api_key().as_deref(), Some("k"));

        let keyless = Settings {
            api_key: None,
            use_keychain: false,
            ..Settings::default()
        };
        assert_eq!(keyless.resolve_api_key(), None);
    }

    #[test]
    fn env_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "PROMPT_COOKER_TEST_ONLY_VAR=chef\n").unwrap();
        let loaded = load_env_files(dir.path());
        assert_eq!(loaded, Some(dir.path().join(".env")));
        assert_eq!(std::env::var("PROMPT_COOKER_TEST_ONLY_VAR").unwrap(), "chef");
    }

    #[test]
    fn blank_key_is_not_saved() {
        assert_eq!(save_api_key("   "), Err(CookerError::MissingCredential));
    }
}
