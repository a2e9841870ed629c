//! Collaborators notified when live settings change.
//!
//! - [`ApplySettings`] is the overlay side: after a preset load or a factory
//!   reset the manager asks it to re-read its settings.
//! - [`PresetEvents`] is the "preset loaded" side channel that settings
//!   screens listen on to refresh the values they display.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The component that turns stored settings into visible behavior.
pub trait ApplySettings: Send + Sync {
    /// Re-read every tracked key and take effect.
    fn apply_preferences(&self);

    /// Whether the overlay is currently visible.
    fn is_showing(&self) -> bool;

    /// Hide the overlay.
    fn hide(&self);

    /// Show the overlay.
    fn show(&self);
}

/// Signal broadcast through [`PresetEvents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetEvent {
    /// A preset was loaded into the live settings.
    Loaded {
        /// Identifier of the loaded preset.
        id: String,
    },
}

/// Handle returned by [`PresetEvents::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&PresetEvent) + Send + Sync>;

/// Fire-and-forget listener registry.
///
/// Each registration receives each broadcast at most once, synchronously, on
/// the broadcasting thread. Nothing is queued: a listener registered after a
/// broadcast never sees it.
#[derive(Default)]
pub struct PresetEvents {
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_id: AtomicU64,
}

impl PresetEvents {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn register<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&PresetEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver `event` to every registered listener.
    ///
    /// Returns the number of listeners reached. Listeners run outside the
    /// registry lock and may register or unregister re-entrantly.
    pub fn broadcast(&self, event: &PresetEvent) -> usize {
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in &snapshot {
            listener(event);
        }
        tracing::debug!(?event, listeners = snapshot.len(), "broadcast preset event");
        snapshot.len()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }
}

impl std::fmt::Debug for PresetEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetEvents")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn loaded(id: &str) -> PresetEvent {
        PresetEvent::Loaded { id: id.to_string() }
    }

    #[test]
    fn each_registration_gets_one_delivery() {
        let events = PresetEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            events.register(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(events.broadcast(&loaded("a")), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unregistered_listener_is_skipped() {
        let events = PresetEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = events.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(events.unregister(id));
        assert!(!events.unregister(id));
        assert_eq!(events.broadcast(&loaded("a")), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn late_listener_misses_earlier_broadcast() {
        let events = PresetEvents::new();
        events.broadcast(&loaded("early"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        events.register(move |event| sink.lock().push(event.clone()));
        events.broadcast(&loaded("late"));

        assert_eq!(*seen.lock(), vec![loaded("late")]);
    }

    #[test]
    fn listener_may_unregister_itself() {
        let events = Arc::new(PresetEvents::new());
        let slot = Arc::new(Mutex::new(None::<ListenerId>));

        let registry = Arc::clone(&events);
        let own_id = Arc::clone(&slot);
        let id = events.register(move |_| {
            if let Some(id) = *own_id.lock() {
                registry.unregister(id);
            }
        });
        *slot.lock() = Some(id);

        assert_eq!(events.broadcast(&loaded("a")), 1);
        assert!(events.is_empty());
    }
}
