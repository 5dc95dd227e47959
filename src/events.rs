//! Observer lists for container notifications.
//!
//! Handlers run synchronously inside the container call that emits them and
//! must not call back into the container; queue the follow-up work instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::geometry::Point;
use crate::models::ItemKey;

new_key_type! {
    /// Identifies one handler, for [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A typed list of handlers.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// While blocked, `emit` does nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invokes every connected handler.
    pub fn emit(&self, args: &Args) {
        if self.is_blocked() {
            tracing::trace!("signal blocked, skipping emit");
            return;
        }

        // Snapshot so handlers may connect or disconnect while running.
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        for slot in slots {
            slot(args);
        }
    }
}

/// Payload of a preview request: the items and the top-left corner of each
/// one's image, in widget coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub items: Vec<ItemKey>,
    pub locations: Vec<Point>,
}

/// Every notification the container emits.
#[derive(Default)]
pub struct CanvasSignals {
    /// The selection set changed; re-query it from the container.
    pub selection_changed: Signal<()>,
    pub item_added: Signal<ItemKey>,
    pub item_removed: Signal<ItemKey>,
    pub cleared: Signal<()>,
    /// Open the items.
    pub activate: Signal<Vec<ItemKey>>,
    /// Open the items some other way (new tab, new window).
    pub activate_alternate: Signal<Vec<ItemKey>>,
    pub activate_previewer: Signal<Preview>,
    pub band_select_started: Signal<()>,
    pub band_select_ended: Signal<()>,
    pub context_click_selection: Signal<()>,
    pub context_click_background: Signal<()>,
    pub middle_click: Signal<()>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(&42);
        signal.emit(&100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(&1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(&2);

        assert_eq!(*received.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        signal.connect(move |_| *count_clone.lock() += 1);

        signal.set_blocked(true);
        signal.emit(&());
        signal.set_blocked(false);
        signal.emit(&());

        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_handler_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let signal_clone = signal.clone();
        signal.connect(move |_| signal_clone.disconnect_all());
        signal.emit(&());
        assert_eq!(signal.connection_count(), 0);
    }
}
