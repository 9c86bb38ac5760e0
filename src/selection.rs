//! Active property selection.
//!
//! The one piece of state shared by the list and the map. Any holder may
//! write; every subscriber sees the latest value. Last writer wins.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Snapshot of the selection with the version it was written at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub property_id: Option<String>,
    /// Bumped on every effective change
    pub version: u64,
}

/// Observable "which property is highlighted" store.
///
/// Cloning is cheap and every clone writes to the same channel.
#[derive(Debug, Clone)]
pub struct ActivePropertyStore {
    tx: Arc<watch::Sender<Selection>>,
}

impl Default for ActivePropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivePropertyStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Selection::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> Option<String> {
        self.tx.borrow().property_id.clone()
    }

    pub fn snapshot(&self) -> Selection {
        self.tx.borrow().clone()
    }

    /// Set (or clear) the active property. Returns `true` if observers were notified.
    ///
    /// Writing the current value again is a no-op.
    pub fn set(&self, property_id: Option<String>) -> bool {
        self.tx.send_if_modified(|current| {
            if current.property_id == property_id {
                return false;
            }
            debug!(from = ?current.property_id, to = ?property_id, "Active property changed");
            current.property_id = property_id;
            current.version += 1;
            true
        })
    }

    pub fn clear(&self) -> bool {
        self.set(None)
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_bumps_version_and_ignores_repeats() {
        let store = ActivePropertyStore::new();
        assert!(store.set(Some("p1".into())));
        assert!(!store.set(Some("p1".into())));
        assert!(store.set(Some("p2".into())));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.property_id.as_deref(), Some("p2"));
        assert_eq!(snapshot.version, 2);
    }

    #[tokio::test]
    async fn clones_share_state_and_last_writer_wins() {
        let list_side = ActivePropertyStore::new();
        let map_side = list_side.clone();
        let mut rx = list_side.subscribe();

        list_side.set(Some("p1".into()));
        map_side.set(Some("p7".into()));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().property_id.as_deref(), Some("p7"));
        assert_eq!(list_side.get().as_deref(), Some("p7"));

        assert!(map_side.clear());
        assert_eq!(list_side.get(), None);
    }
}
