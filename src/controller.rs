//! Application controller: orchestrates generate, history and sharing.
//!
//! Owns the live working state (input, options, displayed prompt, error)
//! and the recipe book. Presentation code reads `view()` and calls the
//! action methods; nothing here renders.
//!
//! At most one generation is in flight: `loading` is claimed with a
//! compare-exchange before the service is called and released by a drop
//! guard, so an abandoned future cannot leave it set. No lock is held
//! across the await.

use crate::clipboard::ClipboardWriter;
use crate::error::{CookerError, Result};
use crate::history::{HistoryLog, HistoryStore};
use crate::llm::GenerativeService;
use crate::recipe;
use crate::types::{Format, HistoryItem, Level, SharedRecipe, Tone, TuningOptions};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Snapshot of everything the presentation layer shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub user_input: String,
    pub tuning_options: TuningOptions,
    /// Prompt on display; empty while cooking or after a failure.
    pub generated_prompt: String,
    /// Current-operation error message, replacing any previous result.
    pub error: Option<String>,
    pub loading: bool,
}

/// What happened while starting up. Neither failure is fatal.
#[derive(Debug, Default)]
pub struct StartupReport {
    /// A recipe from the launch address replaced the working state.
    pub imported: Option<SharedRecipe>,
    /// Launch address with the recipe parameter removed, for the address bar.
    pub cleaned_address: Option<String>,
    pub recipe_error: Option<CookerError>,
    pub history_error: Option<CookerError>,
    pub history_len: usize,
}

#[derive(Debug, Clone)]
struct Working {
    user_input: String,
    tuning_options: TuningOptions,
    generated_prompt: String,
    error: Option<String>,
}

impl Working {
    /// The ribeye example shown on first launch.
    fn preloaded() -> Self {
        Self {
            user_input: "I want to grill the perfect ribeye steak.".to_string(),
            tuning_options: TuningOptions {
                tone: Tone::Humorous,
                format: Format::Paragraph,
                verbosity: Level::clamped(3),
                complexity: Level::clamped(3),
                persona: "A witty, seasoned BBQ pitmaster from Texas".to_string(),
                negative_prompt: "boring, flavorless, corporate jargon".to_string(),
            },
            generated_prompt: "As a witty, seasoned BBQ pitmaster from Texas, write a {{humorous, moderately detailed (3/5), standard complexity (3/5)}} guide on how to grill a perfect medium-rare ribeye steak. Ensure the guide is formatted as a {{paragraph}} and strictly avoid {{boring, flavorless, corporate jargon}}. Focus on {{selecting the right cut}}, {{seasoning}}, the {{high-heat searing process}}, {{indirect heat cooking for a red center}}, and {{resting the steak}}. Make it sound so delicious and straightforward that even a rookie can feel like a grilling champion.".to_string(),
            error: None,
        }
    }
}

/// Resets the loading flag when the generation ends, however it ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Controller<S: GenerativeService> {
    service: S,
    share_host: String,
    working: Mutex<Working>,
    history: Mutex<HistoryStore>,
    loading: AtomicBool,
}

impl<S: GenerativeService> Controller<S> {
    /// Build a controller showing the preloaded example. Call `start` next.
    pub fn new(service: S, history: HistoryStore, share_host: impl Into<String>) -> Self {
        Self {
            service,
            share_host: share_host.into(),
            working: Mutex::new(Working::preloaded()),
            history: Mutex::new(history),
            loading: AtomicBool::new(false),
        }
    }

    fn working(&self) -> MutexGuard<'_, Working> {
        self.working.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn book(&self) -> MutexGuard<'_, HistoryStore> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recoverable kinds are only logged. Anything else replaces the
    /// displayed result with `message`.
    fn record_failure(&self, err: &CookerError, message: String) {
        if err.is_recoverable() {
            log::warn!("[APP] {}", message);
            return;
        }
        log::error!("[APP] {}", message);
        let mut w = self.working();
        w.generated_prompt.clear();
        w.error = Some(message);
    }

    /// Import a recipe from the launch address, then load history.
    ///
    /// The two steps fail independently and neither blocks startup.
    pub fn start(&self, launch_address: Option<&str>) -> StartupReport {
        let mut report = StartupReport::default();

        if let Some(token) = launch_address.and_then(recipe::extract_token) {
            match self.import_recipe(&token) {
                Ok(imported) => {
                    report.imported = Some(imported);
                    report.cleaned_address = launch_address.and_then(recipe::strip_recipe_param);
                }
                Err(e) => report.recipe_error = Some(e),
            }
        }

        let loaded = self.book().load();
        report.history_len = loaded.log.len();
        if let Some(e) = &loaded.diagnostic {
            self.record_failure(e, format!("Failed to load recipe book: {}", e));
        }
        report.history_error = loaded.diagnostic;

        log::info!(
            "[APP] Started: recipe imported={}, {} recipes in book",
            report.imported.is_some(),
            report.history_len
        );
        report
    }

    /// Decode a share token into the working state.
    ///
    /// On failure the working state is left untouched.
    pub fn import_recipe(&self, token: &str) -> Result<SharedRecipe> {
        let imported = recipe::decode(token).map_err(|e| {
            self.record_failure(&e, format!("Failed to load recipe from link: {}", e));
            e
        })?;
        let mut w = self.working();
        w.user_input = imported.user_input.clone();
        w.tuning_options = imported.tuning_options.clone();
        w.generated_prompt.clear();
        w.error = None;
        log::info!("[RECIPE] Loaded shared recipe ({} chars)", imported.user_input.len());
        Ok(imported)
    }

    pub fn set_user_input(&self, text: impl Into<String>) {
        self.working().user_input = text.into();
    }

    pub fn set_tuning_options(&self, options: TuningOptions) {
        self.working().tuning_options = options;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn view(&self) -> ViewState {
        let w = self.working();
        ViewState {
            user_input: w.user_input.clone(),
            tuning_options: w.tuning_options.clone(),
            generated_prompt: w.generated_prompt.clone(),
            error: w.error.clone(),
            loading: self.is_loading(),
        }
    }

    pub fn current_recipe(&self) -> SharedRecipe {
        let w = self.working();
        SharedRecipe::new(w.user_input.clone(), w.tuning_options.clone())
    }

    /// Cook a prompt from the current input and options.
    ///
    /// On success the result is displayed and recorded in the recipe book
    /// with a snapshot of the input and options it was cooked from.
    pub async fn generate(&self) -> Result<String> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("[APP] Generate ignored: a prompt is already cooking");
            return Err(CookerError::GenerationInFlight);
        }
        let _loading = LoadingGuard(&self.loading);

        let (input, options) = {
            let mut w = self.working();
            if w.user_input.trim().is_empty() {
                drop(w);
                let err = CookerError::EmptyInput;
                self.record_failure(&err, err.to_string());
                return Err(err);
            }
            w.generated_prompt.clear();
            w.error = None;
            (w.user_input.clone(), w.tuning_options.clone())
        };

        match self.service.generate(&input, &options).await {
            Ok(prompt) => {
                let item = self.book().record(&input, &options, &prompt, Utc::now());
                log::info!("[APP] Prompt cooked and saved as recipe {}", item.id);
                self.working().generated_prompt = prompt.clone();
                Ok(prompt)
            }
            Err(e) => {
                self.record_failure(&e, format!("Failed to cook prompt: {}", e));
                Err(e)
            }
        }
    }

    /// Restore a past recipe and show its stored prompt verbatim.
    pub fn load_from_history(&self, id: i64) -> Result<HistoryItem> {
        let item = self
            .book()
            .get(id)
            .cloned()
            .ok_or(CookerError::UnknownHistoryItem(id))?;
        let mut w = self.working();
        w.user_input = item.user_input.clone();
        w.tuning_options = item.tuning_options.clone();
        w.generated_prompt = item.generated_prompt.clone();
        w.error = None;
        Ok(item)
    }

    pub fn delete_from_history(&self, id: i64) -> HistoryLog {
        self.book().remove(id)
    }

    pub fn clear_history(&self) -> HistoryLog {
        self.book().clear()
    }

    /// Recipe book entries matching `search` (empty matches everything).
    pub fn history(&self, search: &str) -> HistoryLog {
        self.book().search(search)
    }

    /// Share link for the current input and options.
    pub fn share_current(&self) -> String {
        recipe::share_link(&self.share_host, &self.current_recipe())
    }

    /// `share_current`, also written to the clipboard.
    pub fn share_to_clipboard(&self, clipboard: &mut dyn ClipboardWriter) -> Result<String> {
        let link = self.share_current();
        clipboard.write(&link)?;
        Ok(link)
    }
}
