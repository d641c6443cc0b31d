//! Test doubles for the Cadence collaborator traits.

pub mod builders;
pub mod clock;
pub mod executors;
pub mod predictors;
pub mod recorder;
pub mod samplers;

pub use builders::*;
pub use clock::ManualClock;
pub use executors::RecordingExecutor;
pub use predictors::FixedPredictor;
pub use recorder::Recorder;
pub use samplers::ScriptedSampler;
