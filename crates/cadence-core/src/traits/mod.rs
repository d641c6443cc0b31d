//! Seams to external collaborators.

pub mod cancellation;
pub mod clock;
pub mod executor;
pub mod predictor;
pub mod sampler;

pub use cancellation::{CancelRequest, CancellationToken};
pub use clock::{Clock, SystemClock};
pub use executor::WorkExecutor;
pub use predictor::PredictionProvider;
pub use sampler::ResourceSampler;
