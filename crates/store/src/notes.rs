//! Notes collection store

use crate::{
    Note, NoteUpdate, Observable, Result, SharedStorage, StoreError, WriteScheduler,
    ACTIVE_NOTE_KEY, DEFAULT_DEBOUNCE, NOTES_KEY,
};
use std::time::Duration;
use tokio::sync::watch;

/// The notes collection and the active note pointer.
///
/// Content edits are persisted after the debounce window; structural changes
/// (create, delete, rename) and active pointer changes are written at once.
#[derive(Debug, Clone)]
pub struct NotesStore {
    storage: SharedStorage,
    notes: Observable<Vec<Note>>,
    active: Observable<Option<String>>,
    writer: WriteScheduler,
}

impl NotesStore {
    pub fn new(storage: SharedStorage) -> Self {
        Self::with_debounce(storage, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(storage: SharedStorage, delay: Duration) -> Self {
        Self {
            writer: WriteScheduler::with_delay(storage.clone(), NOTES_KEY, delay),
            storage,
            notes: Observable::default(),
            active: Observable::default(),
        }
    }

    /// Load notes and the active pointer from storage.
    ///
    /// A malformed collection is logged and treated as empty. Without a stored
    /// pointer the first note becomes active.
    pub fn init(&self) -> Result<()> {
        let notes = match self.storage.get_item(NOTES_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<Note>>(&raw) {
                Ok(notes) => notes,
                Err(e) => {
                    tracing::warn!("Failed to parse stored notes, starting empty: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let active = match self.storage.get_item(ACTIVE_NOTE_KEY)? {
            Some(id) if !id.is_empty() => Some(id),
            _ => notes.first().map(|n| n.id.clone()),
        };

        tracing::debug!("Loaded {} notes", notes.len());
        self.notes.set(notes);
        self.active.set(active);
        Ok(())
    }

    /// All notes, newest first
    pub fn notes(&self) -> Vec<Note> {
        self.notes.get()
    }

    pub fn len(&self) -> usize {
        self.notes.with(|n| n.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.with(|notes| notes.iter().find(|n| n.id == id).cloned())
    }

    pub fn active_note_id(&self) -> Option<String> {
        self.active.get()
    }

    /// The note the active pointer refers to, if it exists
    pub fn active_note(&self) -> Option<Note> {
        let id = self.active.get()?;
        self.get(&id)
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Note>> {
        self.notes.subscribe()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<Option<String>> {
        self.active.subscribe()
    }

    /// Create an empty note at the front of the list and make it active
    pub fn create_note(&self, title: Option<&str>) -> Result<String> {
        let note = Note::new(title);
        let id = note.id.clone();
        tracing::debug!("Creating note {}", id);

        self.notes.update(|notes| notes.insert(0, note));
        self.persist_now()?;
        self.set_active_note(&id)?;
        Ok(id)
    }

    /// Delete a note. If it was active, the first remaining note becomes
    /// active, or none when the list is empty.
    pub fn delete_note(&self, id: &str) -> Result<()> {
        let mut found = false;
        self.notes.update(|notes| {
            let before = notes.len();
            notes.retain(|n| n.id != id);
            found = notes.len() != before;
        });
        if !found {
            return Err(StoreError::NoteNotFound(id.to_string()));
        }
        self.persist_now()?;

        if self.active.with(|a| a.as_deref() == Some(id)) {
            match self.notes.with(|notes| notes.first().map(|n| n.id.clone())) {
                Some(next) => self.set_active_note(&next)?,
                None => {
                    self.active.set(None);
                    self.storage.remove_item(ACTIVE_NOTE_KEY)?;
                }
            }
        }
        Ok(())
    }

    /// Point the active pointer at `id`. The id is not checked against the
    /// collection.
    pub fn set_active_note(&self, id: &str) -> Result<()> {
        self.active.set(Some(id.to_string()));
        self.storage.set_item(ACTIVE_NOTE_KEY, id)
    }

    /// Update a note's content or title; persisted after the debounce window
    pub fn update_note(&self, id: &str, update: NoteUpdate) -> Result<()> {
        self.modify(id, |note| note.apply(update))?;
        let json = self.notes.with(|notes| serde_json::to_string(notes))?;
        self.writer.schedule(json);
        Ok(())
    }

    /// Set a note's title verbatim and persist at once
    pub fn rename_note(&self, id: &str, title: &str) -> Result<()> {
        self.modify(id, |note| {
            note.title = title.to_string();
            note.updated_at = chrono::Utc::now();
        })?;
        self.persist_now()
    }

    /// Write any pending debounced change now
    pub fn flush(&self) -> Result<bool> {
        self.writer.flush()
    }

    pub fn has_pending_write(&self) -> bool {
        self.writer.has_pending()
    }

    fn modify(&self, id: &str, f: impl FnOnce(&mut Note)) -> Result<()> {
        if self.get(id).is_none() {
            return Err(StoreError::NoteNotFound(id.to_string()));
        }
        self.notes.update(|notes| {
            if let Some(note) = notes.iter_mut().find(|n| n.id == id) {
                f(note);
            }
        });
        Ok(())
    }

    fn persist_now(&self) -> Result<()> {
        let json = self.notes.with(|notes| serde_json::to_string(notes))?;
        self.writer.write_now(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueStorage, MemoryStorage};
    use std::sync::Arc;

    fn store() -> (Arc<MemoryStorage>, NotesStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = NotesStore::new(storage.clone());
        store.init().unwrap();
        (storage, store)
    }

    fn stored_notes(storage: &MemoryStorage) -> Vec<Note> {
        storage
            .get_item(NOTES_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .unwrap_or_default()
    }

    #[test]
    fn test_init_empty_storage() {
        let (_, store) = store();
        assert!(store.is_empty());
        assert_eq!(store.active_note_id(), None);
        assert_eq!(store.active_note(), None);
    }

    #[test]
    fn test_init_malformed_json_is_empty() {
        let storage = Arc::new(MemoryStorage::with_items([(NOTES_KEY, "{not json")]));
        let store = NotesStore::new(storage);
        store.init().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.active_note_id(), None);
    }

    #[test]
    fn test_init_activates_first_note_without_pointer() {
        let json = r#"[
            {"id":"a","title":"A","content":"","createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-01T00:00:00.000Z"},
            {"id":"b","title":"B","content":"","createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-01T00:00:00.000Z"}
        ]"#;
        let storage = Arc::new(MemoryStorage::with_items([(NOTES_KEY, json)]));
        let store = NotesStore::new(storage.clone());
        store.init().unwrap();
        assert_eq!(store.active_note_id().as_deref(), Some("a"));

        storage.set_item(ACTIVE_NOTE_KEY, "b").unwrap();
        store.init().unwrap();
        assert_eq!(store.active_note().unwrap().title, "B");
    }

    #[test]
    fn test_create_note_is_active_and_persisted() {
        let (storage, store) = store();
        let id = store.create_note(Some("Groceries")).unwrap();

        assert!(!id.is_empty());
        assert_eq!(store.active_note_id().as_deref(), Some(id.as_str()));
        assert_eq!(storage.get_item(ACTIVE_NOTE_KEY).unwrap().as_deref(), Some(id.as_str()));
        assert_eq!(stored_notes(&storage)[0].title, "Groceries");

        let second = store.create_note(None).unwrap();
        assert_ne!(id, second);
        assert_eq!(store.notes()[0].id, second);
    }

    #[test]
    fn test_create_delete_scenario() {
        let (storage, store) = store();
        let a = store.create_note(Some("A")).unwrap();
        let b = store.create_note(Some("B")).unwrap();
        assert_eq!(store.active_note_id(), Some(b.clone()));

        store.delete_note(&b).unwrap();
        assert_eq!(store.active_note_id(), Some(a.clone()));

        store.delete_note(&a).unwrap();
        assert_eq!(store.active_note_id(), None);
        assert_eq!(storage.get_item(ACTIVE_NOTE_KEY).unwrap(), None);
        assert!(stored_notes(&storage).is_empty());
    }

    #[test]
    fn test_delete_inactive_note_keeps_pointer() {
        let (_, store) = store();
        let a = store.create_note(None).unwrap();
        let b = store.create_note(None).unwrap();
        store.delete_note(&a).unwrap();
        assert_eq!(store.active_note_id(), Some(b));
    }

    #[test]
    fn test_unknown_note_errors() {
        let (_, store) = store();
        assert!(matches!(store.delete_note("nope"), Err(StoreError::NoteNotFound(_))));
        assert!(matches!(
            store.update_note("nope", NoteUpdate::content("x")),
            Err(StoreError::NoteNotFound(_))
        ));
        assert!(matches!(store.rename_note("nope", "x"), Err(StoreError::NoteNotFound(_))));
    }

    #[test]
    fn test_rename_persists_immediately() {
        let (storage, store) = store();
        let id = store.create_note(None).unwrap();
        store.rename_note(&id, "Renamed").unwrap();
        assert_eq!(stored_notes(&storage)[0].title, "Renamed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_is_debounced() {
        let (storage, store) = store();
        let id = store.create_note(None).unwrap();

        store.update_note(&id, NoteUpdate::content("<p>Draft</p>")).unwrap();
        store.update_note(&id, NoteUpdate::content("<p>Final text</p>")).unwrap();
        assert_eq!(store.get(&id).unwrap().title, "Final text");
        assert_eq!(stored_notes(&storage)[0].content, "");

        tokio::time::sleep(Duration::from_millis(600)).await;
        let persisted = stored_notes(&storage);
        assert_eq!(persisted[0].content, "<p>Final text</p>");
        assert_eq!(persisted[0].title, "Final text");
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_write_supersedes_pending_update() {
        let (storage, store) = store();
        let id = store.create_note(None).unwrap();

        store.update_note(&id, NoteUpdate::content("<p>Body</p>")).unwrap();
        let other = store.create_note(Some("Other")).unwrap();
        assert!(!store.has_pending_write());

        tokio::time::sleep(Duration::from_secs(1)).await;
        let persisted = stored_notes(&storage);
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].id, other);
        assert_eq!(persisted[1].content, "<p>Body</p>");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_pending_update() {
        let (storage, store) = store();
        let id = store.create_note(None).unwrap();
        store.update_note(&id, NoteUpdate::content("Saved on exit")).unwrap();

        assert!(store.flush().unwrap());
        assert_eq!(stored_notes(&storage)[0].content, "Saved on exit");
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (_, store) = store();
        let mut notes_rx = store.subscribe();
        let mut active_rx = store.subscribe_active();

        let id = store.create_note(None).unwrap();
        notes_rx.changed().await.unwrap();
        assert_eq!(notes_rx.borrow_and_update().len(), 1);
        active_rx.changed().await.unwrap();
        assert_eq!(active_rx.borrow().as_deref(), Some(id.as_str()));
    }
}
