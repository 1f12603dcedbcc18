//! Observable values

use std::sync::Arc;
use tokio::sync::watch;

/// A value holder whose changes can be observed.
///
/// Clones share the same value. Subscribers receive a `watch::Receiver` that
/// always sees the latest value; intermediate values may be skipped.
#[derive(Debug)]
pub struct Observable<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// A copy of the current value
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Modify the value in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Subscribe to changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_update() {
        let value = Observable::new(1);
        value.set(2);
        value.update(|v| *v += 10);
        assert_eq!(value.get(), 12);
        assert_eq!(value.with(|v| v * 2), 24);
    }

    #[test]
    fn test_clones_share_state() {
        let a = Observable::new(String::from("x"));
        let b = a.clone();
        b.set("y".to_string());
        assert_eq!(a.get(), "y");
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let value = Observable::new(0u32);
        let mut rx = value.subscribe();
        assert_eq!(value.subscriber_count(), 1);

        value.set(5);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 5);

        value.update(|v| *v += 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 6);
    }
}
