//! Freeform text buffer store

use crate::{Observable, Result, SharedStorage, WriteScheduler, DEFAULT_DEBOUNCE, TEXT_KEY};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;

/// Word and character counts of a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
            characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        }
    }
}

/// A single persisted text buffer
#[derive(Debug, Clone)]
pub struct TextStore {
    storage: SharedStorage,
    text: Observable<String>,
    writer: WriteScheduler,
}

impl TextStore {
    pub fn new(storage: SharedStorage) -> Self {
        Self::with_debounce(storage, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(storage: SharedStorage, delay: Duration) -> Self {
        Self {
            writer: WriteScheduler::with_delay(storage.clone(), TEXT_KEY, delay),
            storage,
            text: Observable::default(),
        }
    }

    /// Load the stored text, if any
    pub fn init(&self) -> Result<()> {
        if let Some(text) = self.storage.get_item(TEXT_KEY)? {
            self.text.set(text);
        }
        Ok(())
    }

    pub fn text(&self) -> String {
        self.text.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.text.subscribe()
    }

    /// Replace the text in memory only
    pub fn set(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }

    /// Replace the text and persist it after the debounce window
    pub fn update_and_save(&self, text: impl Into<String>) {
        let text = text.into();
        self.text.set(text.clone());
        self.writer.schedule(text);
    }

    /// Empty the buffer and remove the stored value
    pub fn clear(&self) -> Result<()> {
        self.text.set(String::new());
        self.writer.remove_now()
    }

    /// Counts for the current text
    pub fn stats(&self) -> TextStats {
        self.text.with(|t| TextStats::of(t))
    }

    pub fn flush(&self) -> Result<bool> {
        self.writer.flush()
    }
}
