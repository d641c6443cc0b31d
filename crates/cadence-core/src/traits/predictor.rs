//! Optional batch size predictor.

use crate::errors::PredictionError;
use crate::models::{BatchExecutionResult, BatchPrediction, OptimizationTarget, PredictionFeatures};

/// Suggests a batch size from learned history. Suggestions are clamped by
/// the caller and never override an open circuit breaker.
pub trait PredictionProvider: Send + Sync {
    fn predict_batch_size(
        &self,
        features: &PredictionFeatures,
        target: &OptimizationTarget,
    ) -> Result<BatchPrediction, PredictionError>;

    /// Feedback after a job finishes. Default: no-op.
    fn record_outcome(&self, _features: &PredictionFeatures, _result: &BatchExecutionResult) {}
}
