//! Change notification
//!
//! The provider holds a [`ChangeSink`] and calls it synchronously after every
//! mutation that touched at least one row. A notification carries only the
//! identifier whose data changed, never what changed.

use crate::uri::ItemUri;
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::Mutex;

/// Receiver of change notifications. Fire-and-forget: no acknowledgement.
pub trait ChangeSink: Send + Sync {
    fn notify_change(&self, uri: &ItemUri);
}

/// Sink that drops every notification
#[derive(Debug, Default)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn notify_change(&self, _uri: &ItemUri) {}
}

struct Observer {
    uri: ItemUri,
    descendants: bool,
    tx: Sender<ItemUri>,
}

impl Observer {
    fn wants(&self, changed: &ItemUri) -> bool {
        self.uri == *changed
            || (self.descendants && self.uri.is_ancestor_of(changed))
            || changed.is_ancestor_of(&self.uri)
    }
}

/// Channel-backed observer registry.
///
/// A change at `U` reaches an observer registered at `R` when `R == U`, when
/// `R` lies below `U`, or when `U` lies below `R` and the observer asked for
/// descendants.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<Vec<Observer>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `uri`. Dropping the receiver unregisters.
    pub fn register(&self, uri: ItemUri, notify_for_descendants: bool) -> Receiver<ItemUri> {
        let (tx, rx) = channel::unbounded();
        let mut observers = self.observers.lock().unwrap_or_else(|e| e.into_inner());
        observers.push(Observer {
            uri,
            descendants: notify_for_descendants,
            tx,
        });
        rx
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl ChangeSink for ObserverRegistry {
    fn notify_change(&self, uri: &ItemUri) {
        let mut observers = self.observers.lock().unwrap_or_else(|e| e.into_inner());
        observers.retain(|observer| {
            if !observer.wants(uri) {
                return true;
            }
            match observer.tx.send(uri.clone()) {
                Ok(()) => true,
                Err(_) => {
                    tracing::warn!("Dropping observer of {}: receiver gone", observer.uri);
                    false
                }
            }
        });
    }
}
