//! # cadence-engine
//!
//! Computes batch sizes per operation type from observed performance.
//! Each type carries its own size, strategy, circuit breaker, and bounded
//! metrics history.

pub mod breaker;
pub mod constraints;
pub mod engine;
pub mod recommendation;
pub mod scoring;
pub mod sequence;
pub mod state;
pub mod strategies;
pub mod summary;

pub use engine::AdaptiveBatchingEngine;
pub use recommendation::{
    BatchRecommendation, ImpactLevel, Reason, ReasonCode, ResourceImpact,
};
pub use summary::TypeSummary;
