//! Theme preference store

use crate::{Observable, Result, SharedStorage, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Class set on the presentation root while the dark theme is active
pub const DARK_CLASS: &str = "dark";

/// Application theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Where the active theme is mirrored for rendering
pub trait PresentationTarget: fmt::Debug + Send + Sync {
    /// Add or remove a class on the presentation root
    fn toggle_class(&self, class: &str, enabled: bool);
}

/// An in-memory class list standing in for the document root element
#[derive(Debug, Default)]
pub struct ClassList {
    classes: Mutex<BTreeSet<String>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.lock().contains(class)
    }

    /// Classes in sorted order
    pub fn classes(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.classes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PresentationTarget for ClassList {
    fn toggle_class(&self, class: &str, enabled: bool) {
        let mut classes = self.lock();
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }
}

/// The theme preference, persisted and mirrored onto a presentation target
#[derive(Debug, Clone)]
pub struct ThemeStore {
    storage: SharedStorage,
    target: Arc<dyn PresentationTarget>,
    theme: Observable<Theme>,
}

impl ThemeStore {
    pub fn new(storage: SharedStorage, target: Arc<dyn PresentationTarget>) -> Self {
        Self {
            storage,
            target,
            theme: Observable::default(),
        }
    }

    /// Load the stored theme, defaulting to dark, and mirror it
    pub fn init(&self) -> Result<()> {
        let theme = match self.storage.get_item(THEME_KEY)? {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
            None => Theme::default(),
        };
        self.theme.set(theme);
        self.mirror(theme);
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    /// Persist, mirror and publish `theme`
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.set_item(THEME_KEY, theme.as_str())?;
        self.mirror(theme);
        self.theme.set(theme);
        Ok(())
    }

    /// Switch between light and dark. Returns the new theme.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn mirror(&self, theme: Theme) {
        self.target.toggle_class(DARK_CLASS, theme.is_dark());
    }
}
