use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::types::{EventKind, Notification};

type Callback = dyn Fn(&serde_json::Value) + Send + Sync;

/// Capacity of the broadcast channel behind `events()`
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Fan-out of notifications to registered callbacks and event streams
///
/// Listeners are append-only. Dispatch works on a snapshot of the list, so a
/// callback may register further listeners or drive the client.
pub(crate) struct Notifier<K> {
    listeners: RwLock<Vec<(K, Arc<Callback>)>>,
    events: broadcast::Sender<Notification<K>>,
}

impl<K: EventKind> Notifier<K> {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            listeners: RwLock::new(Vec::new()),
            events,
        }
    }

    pub fn register<F>(&self, kind: K, callback: F)
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push((kind, Arc::new(callback)));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification<K>> {
        self.events.subscribe()
    }

    /// Deliver a notification to every listener of its kind, in registration order
    pub fn notify(&self, notification: Notification<K>) {
        let matching: Vec<Arc<Callback>> = {
            let listeners = match self.listeners.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            listeners
                .iter()
                .filter(|(kind, _)| *kind == notification.kind)
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        log::trace!(
            "Dispatching {} to {} listener(s)",
            notification.kind.as_str(),
            matching.len()
        );

        for callback in matching {
            callback(&notification.data);
        }

        // No live stream is not an error
        let _ = self.events.send(notification);
    }
}
