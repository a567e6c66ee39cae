//! Bounded-drain pub/sub event bus
//!
//! Publishing is cheap and safe from any thread; dispatch only happens when
//! the simulation thread calls [`EventBus::drain`]. Each drain delivers at
//! most [`MAX_EVENTS_PER_DRAIN`] events so a burst of publishes spreads its
//! handling cost over several ticks instead of stalling one.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::core::lock;

use super::{EventKind, GameEvent};

/// Upper bound on events delivered by a single drain call.
pub const MAX_EVENTS_PER_DRAIN: usize = 5;

/// Receiver of dispatched events.
///
/// Handlers run on the simulation thread during drain and may publish or
/// subscribe from within `notify`. A listener receiving a kind it never
/// subscribed to is a wiring bug; implementations panic on it.
pub trait EventListener: Send + Sync {
    fn notify(&self, event: &GameEvent);
}

/// The pub/sub hub connecting all simulation components.
#[derive(Default)]
pub struct EventBus {
    queue: Mutex<VecDeque<GameEvent>>,
    registry: Mutex<AHashMap<EventKind, Vec<Arc<dyn EventListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an event for delivery on a future drain. Never blocks on
    /// dispatch and never drops.
    pub fn publish(&self, event: GameEvent) {
        trace!(kind = ?event.kind(), "event published");
        lock(&self.queue).push_back(event);
    }

    /// Registers `listener` for events of `kind`. Subscribing the same
    /// listener twice means it is notified twice per event.
    pub fn subscribe(&self, kind: EventKind, listener: Arc<dyn EventListener>) {
        lock(&self.registry).entry(kind).or_default().push(listener);
    }

    /// Removes one registration of `listener` for `kind`, matched by
    /// pointer identity. Unknown registrations are ignored.
    pub fn unsubscribe(&self, kind: EventKind, listener: &Arc<dyn EventListener>) {
        let mut registry = lock(&self.registry);
        if let Some(listeners) = registry.get_mut(&kind) {
            if let Some(index) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
                listeners.remove(index);
            }
        }
    }

    /// Number of events waiting in the queue.
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Delivers up to [`MAX_EVENTS_PER_DRAIN`] queued events, oldest first,
    /// to the listeners registered for each event's kind in registration
    /// order. Returns the number of events delivered.
    ///
    /// The listener list is snapshotted per event before dispatch, so
    /// handlers may subscribe new listeners; those see later events only.
    pub fn drain(&self) -> usize {
        let mut delivered = 0;
        while delivered < MAX_EVENTS_PER_DRAIN {
            let Some(event) = lock(&self.queue).pop_front() else {
                break;
            };
            let listeners: Vec<Arc<dyn EventListener>> = lock(&self.registry)
                .get(&event.kind())
                .map(|l| l.to_vec())
                .unwrap_or_default();
            debug!(kind = ?event.kind(), listeners = listeners.len(), "dispatching event");
            for listener in &listeners {
                listener.notify(&event);
            }
            delivered += 1;
        }
        delivered
    }
}
