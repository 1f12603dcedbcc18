//! Application context
//!
//! Owns every store for the lifetime of the application. Stores are built and
//! initialised together, and pending debounced writes are flushed on
//! teardown or when the context is dropped.

use crate::{NoteEditor, ResizableImage, ResizableImageOptions, Result};
use std::path::Path;
use std::sync::Arc;
use store::{
    AppSettings, ClassList, FileStorage, NotesStore, SettingsManager, SharedStorage, TextStore,
    ThemeStore,
};

/// Directory under the data directory holding the key-value storage
pub const STORAGE_DIR: &str = "storage";

/// Load settings from `data_dir`, falling back to defaults on failure
pub fn load_settings(data_dir: impl AsRef<Path>) -> AppSettings {
    let mut manager = SettingsManager::new(data_dir);
    match manager.load_sync() {
        Ok(settings) => settings.clone(),
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

/// All application state
#[derive(Debug)]
pub struct AppContext {
    settings: AppSettings,
    notes: NotesStore,
    text: TextStore,
    theme: ThemeStore,
    presentation: Arc<ClassList>,
    extension: ResizableImage,
    closed: bool,
}

impl AppContext {
    /// Build and initialise every store over `storage`
    pub fn init(storage: SharedStorage, settings: AppSettings) -> Result<Self> {
        let debounce = settings.editing.autosave_debounce();
        let presentation = Arc::new(ClassList::new());

        let notes = NotesStore::with_debounce(storage.clone(), debounce);
        let text = TextStore::with_debounce(storage.clone(), debounce);
        let theme = ThemeStore::new(storage, presentation.clone());

        notes.init()?;
        text.init()?;
        theme.init()?;

        let extension = ResizableImage::configure(ResizableImageOptions::from(&settings.images));
        tracing::info!(
            "Loaded {} notes, theme {}",
            notes.len(),
            theme.theme()
        );

        Ok(Self {
            settings,
            notes,
            text,
            theme,
            presentation,
            extension,
            closed: false,
        })
    }

    /// Open the context stored in `data_dir`
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let settings = load_settings(data_dir.as_ref());
        Self::open_with_settings(data_dir, settings)
    }

    /// Open the storage in `data_dir` with already loaded settings
    pub fn open_with_settings(data_dir: impl AsRef<Path>, settings: AppSettings) -> Result<Self> {
        let storage = FileStorage::open(data_dir.as_ref().join(STORAGE_DIR))?;
        tracing::info!("Storage directory: {:?}", storage.dir());
        Self::init(Arc::new(storage), settings)
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn text(&self) -> &TextStore {
        &self.text
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    /// Root class list the theme is mirrored onto
    pub fn presentation(&self) -> &ClassList {
        &self.presentation
    }

    pub fn extension(&self) -> &ResizableImage {
        &self.extension
    }

    /// Open an editor on the active note, if there is one
    pub fn edit_active_note(&self) -> Option<(String, NoteEditor)> {
        let note = self.notes.active_note()?;
        let editor = NoteEditor::open(self.extension.clone(), &note.content);
        Some((note.id, editor))
    }

    /// Write every pending change
    pub fn flush(&self) -> Result<()> {
        self.notes.flush()?;
        self.text.flush()?;
        Ok(())
    }

    /// Flush pending writes and close the context
    pub fn teardown(mut self) -> Result<()> {
        self.closed = true;
        self.flush()?;
        tracing::info!("Application context closed");
        Ok(())
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush pending writes: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{KeyValueStorage, MemoryStorage, NoteUpdate, NOTES_KEY, TEXT_KEY};

    fn context() -> (Arc<MemoryStorage>, AppContext) {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AppContext::init(storage.clone(), AppSettings::default()).unwrap();
        (storage, ctx)
    }

    #[test]
    fn test_init_defaults() {
        let (_, ctx) = context();
        assert!(ctx.notes().is_empty());
        assert_eq!(ctx.text().text(), "");
        assert!(ctx.presentation().contains("dark"));
        assert!(ctx.edit_active_note().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_flushes_pending_writes() {
        let (storage, ctx) = context();
        let id = ctx.notes().create_note(None).unwrap();
        ctx.notes()
            .update_note(&id, NoteUpdate::content("<p>unsaved</p>"))
            .unwrap();
        ctx.text().update_and_save("scratch");

        ctx.teardown().unwrap();
        assert_eq!(storage.get_item(TEXT_KEY).unwrap().as_deref(), Some("scratch"));
        assert!(storage.get_item(NOTES_KEY).unwrap().unwrap().contains("unsaved"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_flushes_pending_writes() {
        let (storage, ctx) = context();
        ctx.text().update_and_save("on drop");
        drop(ctx);
        assert_eq!(storage.get_item(TEXT_KEY).unwrap().as_deref(), Some("on drop"));
    }

    #[test]
    fn test_edit_active_note() {
        let (_, ctx) = context();
        let id = ctx.notes().create_note(Some("First")).unwrap();
        let (active, editor) = ctx.edit_active_note().unwrap();
        assert_eq!(active, id);
        assert_eq!(editor.plain_text(), "");
    }
}
