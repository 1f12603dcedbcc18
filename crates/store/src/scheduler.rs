//! Debounced persistence
//!
//! A [`WriteScheduler`] owns a single pending write for one storage key.
//! Scheduling a new value cancels the pending one and restarts the quiet
//! window, so only the last value of a burst reaches storage.

use crate::{Result, SharedStorage};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Default quiet window before a scheduled write lands
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
struct PendingSlot {
    /// Bumped on every schedule, cancel and immediate write
    generation: u64,
    value: Option<String>,
    timer: Option<JoinHandle<()>>,
}

impl PendingSlot {
    /// Drop the pending value and its timer
    fn clear(&mut self) -> Option<String> {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.value.take()
    }
}

/// Debounced writer for one storage key
#[derive(Debug, Clone)]
pub struct WriteScheduler {
    storage: SharedStorage,
    key: &'static str,
    delay: Duration,
    slot: Arc<Mutex<PendingSlot>>,
}

impl WriteScheduler {
    /// Create a scheduler with the default debounce window
    pub fn new(storage: SharedStorage, key: &'static str) -> Self {
        Self::with_delay(storage, key, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(storage: SharedStorage, key: &'static str, delay: Duration) -> Self {
        Self {
            storage,
            key,
            delay,
            slot: Arc::new(Mutex::new(PendingSlot::default())),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a write is waiting for its timer
    pub fn has_pending(&self) -> bool {
        self.lock().value.is_some()
    }

    /// Arm a write of `value`, replacing any pending one.
    ///
    /// Outside a tokio runtime there is no timer to arm and the value is
    /// written straight away.
    pub fn schedule(&self, value: String) {
        let mut slot = self.lock();
        slot.clear();

        let Ok(handle) = Handle::try_current() else {
            drop(slot);
            if let Err(e) = self.storage.set_item(self.key, &value) {
                tracing::warn!("Failed to persist '{}': {}", self.key, e);
            }
            return;
        };

        let generation = slot.generation;
        slot.value = Some(value);

        let scheduler = self.clone();
        slot.timer = Some(handle.spawn(async move {
            tokio::time::sleep(scheduler.delay).await;
            scheduler.fire(generation);
        }));
    }

    /// Write `value` now, cancelling any pending write
    pub fn write_now(&self, value: &str) -> Result<()> {
        let mut slot = self.lock();
        slot.clear();
        self.storage.set_item(self.key, value)
    }

    /// Remove the key now, cancelling any pending write
    pub fn remove_now(&self) -> Result<()> {
        let mut slot = self.lock();
        slot.clear();
        self.storage.remove_item(self.key)
    }

    /// Write the pending value immediately. Returns whether anything was written.
    pub fn flush(&self) -> Result<bool> {
        let mut slot = self.lock();
        match slot.clear() {
            Some(value) => {
                self.storage.set_item(self.key, &value)?;
                tracing::debug!("Flushed pending write for '{}'", self.key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop the pending write without persisting it
    pub fn cancel(&self) {
        self.lock().clear();
    }

    fn fire(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.generation != generation {
            return;
        }
        slot.timer = None;
        if let Some(value) = slot.value.take() {
            if let Err(e) = self.storage.set_item(self.key, &value) {
                tracing::warn!("Debounced write of '{}' failed: {}", self.key, e);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, PendingSlot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueStorage, MemoryStorage, TEXT_KEY};

    fn scheduler() -> (Arc<MemoryStorage>, WriteScheduler) {
        let storage = Arc::new(MemoryStorage::new());
        let scheduler = WriteScheduler::new(storage.clone(), TEXT_KEY);
        (storage, scheduler)
    }

    fn stored(storage: &MemoryStorage) -> Option<String> {
        storage.get_item(TEXT_KEY).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_of_burst_is_written() {
        let (storage, scheduler) = scheduler();

        for i in 1..=5 {
            scheduler.schedule(format!("draft {}", i));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(stored(&storage), None);
        assert!(scheduler.has_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(stored(&storage).as_deref(), Some("draft 5"));
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_lands_after_quiet_window() {
        let (storage, scheduler) = scheduler();
        scheduler.schedule("a".to_string());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(stored(&storage), None);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(stored(&storage).as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_now_supersedes_pending() {
        let (storage, scheduler) = scheduler();
        scheduler.schedule("stale".to_string());
        scheduler.write_now("fresh").unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(stored(&storage).as_deref(), Some("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_and_cancel() {
        let (storage, scheduler) = scheduler();

        scheduler.schedule("kept".to_string());
        assert!(scheduler.flush().unwrap());
        assert_eq!(stored(&storage).as_deref(), Some("kept"));
        assert!(!scheduler.flush().unwrap());

        scheduler.schedule("dropped".to_string());
        scheduler.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(stored(&storage).as_deref(), Some("kept"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_now() {
        let (storage, scheduler) = scheduler();
        scheduler.write_now("text").unwrap();
        scheduler.schedule("pending".to_string());
        scheduler.remove_now().unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(stored(&storage), None);
    }

    #[test]
    fn test_without_runtime_writes_immediately() {
        let (storage, scheduler) = scheduler();
        scheduler.schedule("sync".to_string());
        assert_eq!(stored(&storage).as_deref(), Some("sync"));
        assert!(!scheduler.has_pending());
    }
}
