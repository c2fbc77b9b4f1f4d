//! End-to-end controller flows against a scripted generative service.
//!
//! No network: `Scripted` returns canned results, optionally after a
//! delay so overlapping generations can be observed.

use prompt_cooker_lib::clipboard::ClipboardWriter;
use prompt_cooker_lib::history::{HistoryStore, KeyValueStore, MemoryStore, HISTORY_KEY};
use prompt_cooker_lib::llm::GenerativeService;
use prompt_cooker_lib::recipe;
use prompt_cooker_lib::{Controller, CookerError, Format, Level, SharedRecipe, Tone, TuningOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Scripted {
    calls: Arc<AtomicUsize>,
    delay: Duration,
    outcome: Mutex<Result<String, CookerError>>,
}

impl Scripted {
    fn ok(prompt: &str) -> Self {
        Self {
            calls: Arc::default(),
            delay: Duration::ZERO,
            outcome: Mutex::new(Ok(prompt.to_string())),
        }
    }

    fn failing(err: CookerError) -> Self {
        Self {
            calls: Arc::default(),
            delay: Duration::ZERO,
            outcome: Mutex::new(Err(err)),
        }
    }

    fn slow(prompt: &str, delay: Duration) -> Self {
        Self { delay, ..Self::ok(prompt) }
    }
}

impl GenerativeService for Scripted {
    async fn generate(&self, _user_input: &str, _options: &TuningOptions) -> Result<String, CookerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.lock().unwrap().clone()
    }
}

fn kitchen(service: Scripted) -> (Controller<Scripted>, MemoryStore) {
    let store = MemoryStore::new();
    let controller = Controller::new(service, HistoryStore::new(store.clone()), "promptcooker.app");
    (controller, store)
}

fn party_options() -> TuningOptions {
    TuningOptions {
        tone: Tone::Formal,
        format: Format::BulletPoints,
        verbosity: Level::clamped(4),
        complexity: Level::clamped(2),
        persona: "A party planner".to_string(),
        negative_prompt: "clowns".to_string(),
    }
}

#[tokio::test]
async fn generate_records_snapshot_and_persists() {
    let (c, store) = kitchen(Scripted::ok("A {{festive}} plan"));
    c.start(None);
    c.set_user_input("Plan a birthday party");
    c.set_tuning_options(party_options());

    let prompt = c.generate().await.unwrap();
    assert_eq!(prompt, "A {{festive}} plan");

    let log = c.history("");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].user_input, "Plan a birthday party");
    assert_eq!(log[0].tuning_options, party_options());
    assert_eq!(log[0].generated_prompt, prompt);

    let stored = store.get(HISTORY_KEY).unwrap().expect("log persisted");
    assert!(stored.contains("Plan a birthday party"));
}

#[tokio::test]
async fn empty_input_never_reaches_the_service() {
    let service = Scripted::ok("unused");
    let calls = service.calls.clone();
    let (c, _) = kitchen(service);
    c.set_user_input("  \t ");
    assert_eq!(c.generate().await, Err(CookerError::EmptyInput));
    assert_eq!(c.history("").len(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!c.view().loading);
}

#[tokio::test]
async fn service_failure_is_shown_and_not_recorded() {
    let (c, _) = kitchen(Scripted::failing(CookerError::MissingCredential));
    c.set_user_input("Write a haiku");
    assert_eq!(c.generate().await, Err(CookerError::MissingCredential));

    let view = c.view();
    assert!(view.generated_prompt.is_empty());
    let error = view.error.expect("error shown");
    assert!(error.starts_with("Failed to cook prompt:"));
    assert!(error.contains("API Key"));
    assert!(!view.loading);
    assert!(c.history("").is_empty());
}

#[tokio::test]
async fn empty_generation_is_reported() {
    let (c, _) = kitchen(Scripted::failing(CookerError::EmptyGeneration));
    c.set_user_input("Anything");
    assert_eq!(c.generate().await, Err(CookerError::EmptyGeneration));
    assert!(c.history("").is_empty());
}

#[tokio::test]
async fn overlapping_generate_is_refused() {
    let service = Scripted::slow("slow cooked", Duration::from_millis(100));
    let calls = service.calls.clone();
    let (c, _) = kitchen(service);
    c.set_user_input("Braise short ribs");

    let (first, second) = tokio::join!(c.generate(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(c.is_loading());
        c.generate().await
    });

    assert_eq!(first.unwrap(), "slow cooked");
    assert_eq!(second, Err(CookerError::GenerationInFlight));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.history("").len(), 1);
    assert!(!c.is_loading());

    // Flag is released, so the next call goes through.
    assert!(c.generate().await.is_ok());
    assert_eq!(c.history("").len(), 2);
}

#[tokio::test]
async fn default_options_record_one_matching_item() {
    let (c, _) = kitchen(Scripted::ok("A {{birthday}} plan"));
    c.set_user_input("Plan a birthday party");
    c.set_tuning_options(TuningOptions::default());
    c.generate().await.unwrap();

    let log = c.history("");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].user_input, "Plan a birthday party");
    assert_eq!(log[0].tuning_options, TuningOptions::default());
    assert_eq!(log[0].generated_prompt, "A {{birthday}} plan");
}

#[tokio::test]
async fn newest_generation_is_first() {
    let (c, _) = kitchen(Scripted::ok("cooked"));
    for idea in ["first", "second", "third"] {
        c.set_user_input(idea);
        c.generate().await.unwrap();
    }
    let inputs: Vec<String> = c.history("").into_iter().map(|i| i.user_input).collect();
    assert_eq!(inputs, vec!["third", "second", "first"]);

    let ids: Vec<i64> = c.history("").into_iter().map(|i| i.id).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "ids must be unique and increasing: {:?}", ids);
}

#[tokio::test]
async fn load_from_history_needs_no_service_call() {
    let (c, _) = kitchen(Scripted::ok("stored prompt"));
    c.set_user_input("Original idea");
    c.set_tuning_options(party_options());
    c.generate().await.unwrap();
    let id = c.history("")[0].id;

    c.set_user_input("Edited later");
    c.set_tuning_options(TuningOptions::default());
    c.load_from_history(id).unwrap();

    let view = c.view();
    assert_eq!(view.user_input, "Original idea");
    assert_eq!(view.tuning_options, party_options());
    assert_eq!(view.generated_prompt, "stored prompt");
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn delete_and_clear() {
    let (c, store) = kitchen(Scripted::ok("cooked"));
    for idea in ["a", "b"] {
        c.set_user_input(idea);
        c.generate().await.unwrap();
    }
    let newest = c.history("")[0].id;

    let after_delete = c.delete_from_history(newest);
    assert_eq!(after_delete.len(), 1);
    assert_eq!(after_delete[0].user_input, "a");

    // Unknown ids leave the log alone.
    assert_eq!(c.delete_from_history(newest).len(), 1);

    assert!(c.clear_history().is_empty());
    assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn share_then_import_restores_the_recipe() {
    let (sender, _) = kitchen(Scripted::ok("unused"));
    sender.set_user_input("Explain ✨ quantum tea ☕ to a child");
    sender.set_tuning_options(party_options());
    let link = sender.share_current();
    assert!(link.starts_with("https://promptcooker.app/?recipe="));

    let (receiver, _) = kitchen(Scripted::ok("unused"));
    let report = receiver.start(Some(&link));
    assert!(report.recipe_error.is_none());
    assert_eq!(report.cleaned_address.as_deref(), Some("https://promptcooker.app/"));

    let view = receiver.view();
    assert_eq!(view.user_input, "Explain ✨ quantum tea ☕ to a child");
    assert_eq!(view.tuning_options, party_options());
    assert!(view.generated_prompt.is_empty());
}

#[test]
fn bad_link_keeps_state_and_still_loads_history() {
    let saved = r#"[{"id":1,"timestamp":"2024-05-01T10:00:00Z","userInput":"old idea",
        "tuningOptions":{"tone":"Casual","format":"Auto","verbosity":3,"complexity":3,
        "persona":"","negativePrompt":""},"generatedPrompt":"old prompt"}]"#;
    let store = MemoryStore::with_entry(HISTORY_KEY, saved);
    let c = Controller::new(Scripted::ok("unused"), HistoryStore::new(store), "promptcooker.app");
    let before = c.view();

    let report = c.start(Some("https://promptcooker.app/?recipe=%25%25not-base64"));
    assert!(matches!(report.recipe_error, Some(CookerError::MalformedRecipe(_))));
    assert!(report.imported.is_none());
    assert_eq!(report.history_len, 1);
    assert!(report.history_error.is_none());
    assert_eq!(c.view(), before);
    assert_eq!(c.history("old")[0].generated_prompt, "old prompt");
}

#[test]
fn corrupt_history_starts_empty() {
    let store = MemoryStore::with_entry(HISTORY_KEY, "{not json");
    let c = Controller::new(Scripted::ok("unused"), HistoryStore::new(store), "promptcooker.app");
    let report = c.start(None);
    assert!(matches!(report.history_error, Some(CookerError::HistoryLoadFailure(_))));
    assert_eq!(report.history_len, 0);
    assert!(c.history("").is_empty());
}

#[test]
fn shared_token_matches_codec() {
    let (c, _) = kitchen(Scripted::ok("unused"));
    let link = c.share_current();
    let token = recipe::extract_token(&link).expect("token in link");
    let decoded: SharedRecipe = recipe::decode(&token).unwrap();
    assert_eq!(decoded, c.current_recipe());
}

#[derive(Default)]
struct RecordingClipboard {
    written: Vec<String>,
    fail: bool,
}

impl ClipboardWriter for RecordingClipboard {
    fn write(&mut self, text: &str) -> Result<(), CookerError> {
        if self.fail {
            return Err(CookerError::Clipboard("no display".to_string()));
        }
        self.written.push(text.to_string());
        Ok(())
    }
}

#[test]
fn share_to_clipboard_copies_the_link() {
    let (c, _) = kitchen(Scripted::ok("unused"));
    let mut clipboard = RecordingClipboard::default();
    let link = c.share_to_clipboard(&mut clipboard).unwrap();
    assert_eq!(clipboard.written, vec![link.clone()]);
    assert_eq!(link, c.share_current());

    let mut broken = RecordingClipboard { fail: true, ..Default::default() };
    assert!(matches!(c.share_to_clipboard(&mut broken), Err(CookerError::Clipboard(_))));
}
