//! JobEventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use parking_lot::RwLock;

use super::handler::JobEventHandler;
use super::panic_message;
use super::types::*;
use crate::tracing_setup::events;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default)]
pub struct JobEventDispatcher {
    handlers: RwLock<Vec<Arc<dyn JobEventHandler>>>,
}

impl JobEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn JobEventHandler>) {
        self.handlers.write().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Handlers that panic are caught and do not prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn JobEventHandler)>(&self, event: &'static str, f: F) {
        // Snapshot so handlers may register further handlers.
        let handlers: Vec<_> = self.handlers.read().clone();
        for handler in &handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if let Err(payload) = result {
                events::emit_listener_panicked(event, &panic_message(payload.as_ref()));
            }
        }
    }

    pub fn emit_job_started(&self, event: &JobStartedEvent) {
        self.emit("job_started", |h| h.on_job_started(event));
    }

    pub fn emit_job_completed(&self, event: &JobCompletedEvent) {
        self.emit("job_completed", |h| h.on_job_completed(event));
    }

    pub fn emit_job_failed(&self, event: &JobFailedEvent) {
        self.emit("job_failed", |h| h.on_job_failed(event));
    }

    pub fn emit_job_cancelled(&self, event: &JobCancelledEvent) {
        self.emit("job_cancelled", |h| h.on_job_cancelled(event));
    }

    pub fn emit_batch_optimized(&self, event: &BatchOptimizedEvent) {
        self.emit("batch_optimized", |h| h.on_batch_optimized(event));
    }
}
