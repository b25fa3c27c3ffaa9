//! Shared config value with change notification.
//!
//! `ConfigStore<T>` keeps the current value inside a `tokio::sync::watch`
//! channel, so readers get a cheap snapshot and subscribers can `await`
//! the next update instead of polling.

use std::sync::Arc;
use tokio::sync::watch;

/// A shared configuration value with change notification.
pub struct ConfigStore<T> {
    tx: Arc<watch::Sender<T>>,
}

/// Receives notifications when a [`ConfigStore`] is updated.
pub struct ConfigWatcher<T> {
    rx: watch::Receiver<T>,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the stored value and notify all watchers.
    pub fn update(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> ConfigWatcher<T> {
        ConfigWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone> ConfigStore<T> {
    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> ConfigWatcher<T> {
    /// Wait until the store is updated and return the new value.
    ///
    /// Returns `None` once every [`ConfigStore`] handle has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_is_visible_to_snapshots_and_watchers() {
        let store = ConfigStore::new(1u32);
        let mut watcher = store.subscribe();

        store.update(2);
        assert_eq!(store.snapshot(), 2);
        assert_eq!(watcher.changed().await, Some(2));
    }

    #[tokio::test]
    async fn test_watcher_ends_when_store_dropped() {
        let store = ConfigStore::new("a".to_string());
        let mut watcher = store.subscribe();
        drop(store);
        assert_eq!(watcher.changed().await, None);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = ConfigStore::new(0u8);
        let other = store.clone();
        other.update(7);
        assert_eq!(store.snapshot(), 7);
    }
}
