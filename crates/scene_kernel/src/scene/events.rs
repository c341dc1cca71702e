//! Node lifecycle notifications
//!
//! Each node owns an [`EventDispatcher`] holding per-kind listener lists.
//! Dispatch works on a snapshot of the list, so a listener may register or
//! unregister listeners without affecting the pass in progress.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::NodeId;

/// Lifecycle event identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Node was attached to a parent
    Added,
    /// Node was detached from its parent
    Removed,
    /// Node is about to be dropped from the scene
    Dispose,
}

/// Event delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEvent {
    /// Kind of event
    pub kind: EventKind,
    /// Node the event concerns
    pub target: NodeId,
}

impl NodeEvent {
    /// Create a new event
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self { kind, target }
    }
}

/// Shared listener callback. Identity is the allocation, so cloning the `Arc`
/// yields the same listener.
pub type Listener = Arc<dyn Fn(&NodeEvent) + Send + Sync>;

fn same_listener(a: &Listener, b: &Listener) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// Per-node listener registry
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<HashMap<EventKind, Vec<Listener>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Adding the same listener twice is a no-op.
    pub fn add_listener(&self, kind: EventKind, listener: Listener) {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let list = listeners.entry(kind).or_default();
        if !list.iter().any(|existing| same_listener(existing, &listener)) {
            list.push(listener);
        }
    }

    /// Whether `listener` is registered for `kind`
    pub fn has_listener(&self, kind: EventKind, listener: &Listener) -> bool {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        listeners
            .get(&kind)
            .is_some_and(|list| list.iter().any(|existing| same_listener(existing, listener)))
    }

    /// Unregister a listener
    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = listeners.get_mut(&kind) {
            list.retain(|existing| !same_listener(existing, listener));
        }
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to every listener registered for its kind
    pub fn dispatch(&self, event: &NodeEvent) {
        // Lock is released before any listener runs
        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
            match listeners.get(&event.kind) {
                Some(list) if !list.is_empty() => list.clone(),
                _ => return,
            }
        };

        for listener in &snapshot {
            listener(event);
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<EventKind, usize> =
            listeners.iter().map(|(kind, list)| (*kind, list.len())).collect();
        f.debug_struct("EventDispatcher").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn target() -> NodeId {
        NodeId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_add_is_idempotent() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let listener: Listener = Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.add_listener(EventKind::Added, Arc::clone(&listener));
        dispatcher.add_listener(EventKind::Added, Arc::clone(&listener));
        assert_eq!(dispatcher.listener_count(EventKind::Added), 1);
        assert!(dispatcher.has_listener(EventKind::Added, &listener));
        assert!(!dispatcher.has_listener(EventKind::Removed, &listener));

        dispatcher.dispatch(&NodeEvent::new(EventKind::Added, target()));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Other kinds are not delivered
        dispatcher.dispatch(&NodeEvent::new(EventKind::Removed, target()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_listener() {
        let dispatcher = EventDispatcher::new();
        let listener: Listener = Arc::new(|_| {});
        let other: Listener = Arc::new(|_| {});

        dispatcher.add_listener(EventKind::Dispose, Arc::clone(&listener));
        dispatcher.add_listener(EventKind::Dispose, Arc::clone(&other));
        dispatcher.remove_listener(EventKind::Dispose, &listener);

        assert!(!dispatcher.has_listener(EventKind::Dispose, &listener));
        assert!(dispatcher.has_listener(EventKind::Dispose, &other));
    }

    #[test]
    fn test_listener_mutation_during_dispatch_uses_snapshot() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let calls = Arc::new(Mutex::new(Vec::new()));

        let late_calls = Arc::clone(&calls);
        let late: Listener = Arc::new(move |_| late_calls.lock().unwrap().push("late"));

        let first_calls = Arc::clone(&calls);
        let registry = Arc::clone(&dispatcher);
        let first: Listener = Arc::new(move |_| {
            first_calls.lock().unwrap().push("first");
            registry.add_listener(EventKind::Added, Arc::clone(&late));
        });

        dispatcher.add_listener(EventKind::Added, first);
        dispatcher.dispatch(&NodeEvent::new(EventKind::Added, target()));
        assert_eq!(*calls.lock().unwrap(), vec!["first"]);

        dispatcher.dispatch(&NodeEvent::new(EventKind::Added, target()));
        assert_eq!(*calls.lock().unwrap(), vec!["first", "first", "late"]);
    }
}
