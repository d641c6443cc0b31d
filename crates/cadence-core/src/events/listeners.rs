//! Closure listener registry.

use std::sync::Arc;

use parking_lot::RwLock;

use super::panic_message;
use crate::tracing_setup::events;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Ordered list of closures invoked with a borrowed event.
pub struct ListenerRegistry<E> {
    name: &'static str,
    listeners: RwLock<Vec<Listener<E>>>,
}

impl<E> ListenerRegistry<E> {
    /// `name` identifies the registry in panic logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn register<F>(&self, listener: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Invoke every listener in registration order; panics are logged and
    /// the remaining listeners still run.
    pub fn notify(&self, event: &E) {
        let listeners: Vec<_> = self.listeners.read().clone();
        for listener in &listeners {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| listener(event)));
            if let Err(payload) = result {
                events::emit_listener_panicked(self.name, &panic_message(payload.as_ref()));
            }
        }
    }
}
