//! Recipe book: the bounded, newest-first log of past generations.
//!
//! The whole log lives under one storage key as a JSON array, newest
//! first, at most 50 entries. It is read once at startup; after that
//! the in-memory copy is authoritative and every mutation rewrites the
//! stored array.
//!
//! - **storage**: `KeyValueStore` trait + file and in-memory backends
//! - **age**: "3 hours ago" labels for listings

pub mod age;
pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore};

use crate::error::CookerError;
use crate::types::{HistoryItem, TuningOptions};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Storage key holding the serialized log.
pub const HISTORY_KEY: &str = "promptCookerHistory";

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 50;

/// Ordered snapshot of the log, newest first.
pub type HistoryLog = Vec<HistoryItem>;

/// Result of reading the persisted log. A failed read never propagates:
/// it yields an empty log and a `HistoryLoadFailure` diagnostic.
#[derive(Debug)]
pub struct HistoryLoad {
    pub log: HistoryLog,
    pub diagnostic: Option<CookerError>,
}

/// Exclusive owner and writer of the persisted log.
pub struct HistoryStore {
    backend: Box<dyn KeyValueStore>,
    entries: VecDeque<HistoryItem>,
    capacity: usize,
}

impl HistoryStore {
    /// Wrap a backend. The cache starts empty until `load` is called.
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_capacity(backend, HISTORY_CAPACITY)
    }

    pub fn with_capacity(backend: impl KeyValueStore + 'static, capacity: usize) -> Self {
        Self {
            backend: Box::new(backend),
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Read the persisted log, replacing the cached copy.
    pub fn load(&mut self) -> HistoryLoad {
        self.entries.clear();
        let raw = match self.backend.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("[HISTORY] No saved recipe book yet");
                return HistoryLoad { log: Vec::new(), diagnostic: None };
            }
            Err(e) => return self.load_failed(e.to_string()),
        };

        match serde_json::from_str::<Vec<HistoryItem>>(&raw) {
            Ok(items) => {
                self.entries.extend(items);
                self.entries.truncate(self.capacity);
                log::info!("[HISTORY] Loaded {} recipes", self.entries.len());
                HistoryLoad { log: self.log(), diagnostic: None }
            }
            Err(e) => self.load_failed(e.to_string()),
        }
    }

    fn load_failed(&mut self, reason: String) -> HistoryLoad {
        log::warn!("[HISTORY] Failed to load recipe book, starting empty: {}", reason);
        self.entries.clear();
        HistoryLoad {
            log: Vec::new(),
            diagnostic: Some(CookerError::HistoryLoadFailure(reason)),
        }
    }

    /// Prepend an item and drop whatever falls past capacity.
    pub fn append(&mut self, item: HistoryItem) -> HistoryLog {
        self.entries.push_front(item);
        self.entries.truncate(self.capacity);
        self.persist();
        self.log()
    }

    /// Build a new entry with a fresh id and append it.
    pub fn record(
        &mut self,
        user_input: &str,
        tuning_options: &TuningOptions,
        generated_prompt: &str,
        now: DateTime<Utc>,
    ) -> HistoryItem {
        let item = HistoryItem {
            id: self.next_id(now),
            timestamp: now,
            user_input: user_input.to_string(),
            tuning_options: tuning_options.clone(),
            generated_prompt: generated_prompt.to_string(),
        };
        self.append(item.clone());
        item
    }

    /// Millisecond timestamp, bumped past every id already in the log.
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        match self.entries.iter().map(|e| e.id).max() {
            Some(max) if max >= millis => max + 1,
            _ => millis,
        }
    }

    /// Remove the entry with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: i64) -> HistoryLog {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() != before {
            log::info!("[HISTORY] Deleted recipe {}", id);
            self.persist();
        } else {
            log::debug!("[HISTORY] Delete of unknown id {} ignored", id);
        }
        self.log()
    }

    pub fn clear(&mut self) -> HistoryLog {
        self.entries.clear();
        self.persist();
        log::info!("[HISTORY] Recipe book cleared");
        Vec::new()
    }

    pub fn get(&self, id: i64) -> Option<&HistoryItem> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Full log, newest first.
    pub fn log(&self) -> HistoryLog {
        self.entries.iter().cloned().collect()
    }

    /// Entries whose input contains `query`, ignoring case. Empty query matches all.
    pub fn search(&self, query: &str) -> HistoryLog {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.user_input.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                log::error!("[HISTORY] Failed to serialize recipe book: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set(HISTORY_KEY, &json) {
            log::error!("[HISTORY] Failed to save recipe book: {}", e);
        }
    }
}
