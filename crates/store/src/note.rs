//! Note records and title derivation

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Title used when no text can be derived
pub const UNTITLED: &str = "Untitled";

/// Longest derived title before it is shortened
pub const TITLE_MAX_CHARS: usize = 50;

/// A single note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable identifier, never changed after creation
    pub id: String,
    pub title: String,
    /// Rich-text content as HTML
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create an empty note with a fresh id. A blank title becomes "Untitled".
    pub fn new(title: Option<&str>) -> Self {
        let now = Utc::now();
        let title = match title {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => UNTITLED.to_string(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. The title falls back to one derived from the
    /// content when the update carries no explicit title.
    pub fn apply(&mut self, update: NoteUpdate) {
        if let Some(content) = update.content {
            self.content = content;
        }
        self.title = match update.title {
            Some(title) if !title.is_empty() => title,
            _ => derive_title(&self.content),
        };
        self.updated_at = Utc::now();
    }
}

/// Partial note changes. `id` and `created_at` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

fn tag_pattern() -> Option<&'static Regex> {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

/// Derive a title from HTML content: the first line of its text, shortened
/// to [`TITLE_MAX_CHARS`] characters followed by "...".
pub fn derive_title(content: &str) -> String {
    if content.trim().is_empty() {
        return UNTITLED.to_string();
    }

    let stripped = match tag_pattern() {
        Some(re) => re.replace_all(content, "").into_owned(),
        None => content.to_string(),
    };
    let text = stripped.trim();
    if text.is_empty() {
        return UNTITLED.to_string();
    }

    let first_line = text.split('\n').next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return UNTITLED.to_string();
    }

    let graphemes: Vec<&str> = first_line.graphemes(true).collect();
    if graphemes.len() > TITLE_MAX_CHARS {
        format!("{}...", graphemes[..TITLE_MAX_CHARS].concat())
    } else {
        first_line.to_string()
    }
}
