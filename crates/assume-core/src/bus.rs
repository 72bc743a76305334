//! # Event Bus
//!
//! Minimal publish/subscribe channel keyed by string event names. The
//! aggregator broadcasts [`PASS_EVENT`] / [`FAIL_EVENT`] for every verdict
//! and any caller-defined names requested through its options.
//!
//! The bus is an observability hook only. A listener can neither change a
//! verdict nor stop other listeners from running.
//!
//! Listeners are invoked after the subscriber lock is released, so a listener
//! may itself call `on`, `off` or `emit` without deadlocking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::temporal::Timestamp;

/// Broadcast after every aggregate that passed.
pub const PASS_EVENT: &str = "assume:pass";

/// Broadcast after every aggregate that failed.
pub const FAIL_EVENT: &str = "assume:fail";

/// Envelope delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    /// Event name the listener subscribed to.
    pub name: String,
    /// When the event was emitted.
    pub time: Timestamp,
    /// Caller-supplied data.
    pub payload: JsonValue,
}

/// Handle returned by [`EventBus::on`] / [`EventBus::once`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&BusEvent) + Send + Sync>;

struct Listener {
    id: ListenerId,
    once: bool,
    callback: Callback,
}

/// String-keyed publish/subscribe channel.
pub struct EventBus {
    listeners: Mutex<BTreeMap<String, Vec<Listener>>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe `callback` to every future `event`.
    pub fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&BusEvent) + Send + Sync + 'static,
    {
        self.subscribe(event, false, Arc::new(callback))
    }

    /// Subscribe `callback` to the next `event` only.
    pub fn once<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&BusEvent) + Send + Sync + 'static,
    {
        self.subscribe(event, true, Arc::new(callback))
    }

    fn subscribe(&self, event: &str, once: bool, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .entry(event.to_string())
            .or_default()
            .push(Listener { id, once, callback });
        id
    }

    /// Remove one listener. Returns whether it was subscribed.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(list) = listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    /// Remove every listener of `event`.
    pub fn off_all(&self, event: &str) {
        self.listeners.lock().remove(event);
    }

    /// Remove every listener of every event.
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    /// Number of listeners currently subscribed to `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }

    /// Deliver `payload` to every listener of `event`.
    ///
    /// Returns the number of listeners invoked. `once` listeners are removed
    /// before delivery.
    pub fn emit(&self, event: &str, payload: JsonValue) -> usize {
        let callbacks: Vec<Callback> = {
            let mut listeners = self.listeners.lock();
            let Some(list) = listeners.get_mut(event) else {
                tracing::trace!(event, "no listeners");
                return 0;
            };
            let callbacks = list.iter().map(|l| Arc::clone(&l.callback)).collect();
            list.retain(|l| !l.once);
            if list.is_empty() {
                listeners.remove(event);
            }
            callbacks
        };

        let envelope = BusEvent {
            name: event.to_string(),
            time: Timestamp::now(),
            payload,
        };
        tracing::debug!(event, listeners = callbacks.len(), "emitting bus event");
        for callback in &callbacks {
            callback(&envelope);
        }
        callbacks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.lock();
        f.debug_struct("EventBus")
            .field("events", &listeners.len())
            .field(
                "listeners",
                &listeners.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
