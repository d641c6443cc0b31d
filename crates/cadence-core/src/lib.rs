//! # cadence-core
//!
//! Foundation crate for the Cadence batching system.
//! Defines the shared data model, configuration, error enums, the
//! collaborator traits (executor, predictor, sampler, clock), listener
//! registries, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod history;
pub mod models;
pub mod tracing_setup;
pub mod traits;

pub use config::CadenceConfig;
pub use errors::{CadenceError, CadenceResult};
pub use history::BoundedHistory;
pub use models::*;
