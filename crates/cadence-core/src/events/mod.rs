//! Listener registries with per-listener panic isolation.

pub mod dispatcher;
pub mod handler;
pub mod listeners;
pub mod types;

pub use dispatcher::JobEventDispatcher;
pub use handler::JobEventHandler;
pub use listeners::ListenerRegistry;
pub use types::*;

use std::any::Any;

/// Best-effort text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
