use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use cadence_core::errors::PredictionError;
use cadence_core::models::{
    BatchExecutionResult, BatchPrediction, OptimizationTarget, PredictionFeatures,
};
use cadence_core::traits::PredictionProvider;

/// Always predicts the same size, or always fails.
#[derive(Debug)]
pub struct FixedPredictor {
    size: Option<usize>,
    calls: AtomicUsize,
    targets: Mutex<Vec<OptimizationTarget>>,
    outcomes: Mutex<Vec<BatchExecutionResult>>,
}

impl FixedPredictor {
    pub fn new(size: usize) -> Self {
        Self::build(Some(size))
    }

    pub fn failing() -> Self {
        Self::build(None)
    }

    fn build(size: Option<usize>) -> Self {
        Self {
            size,
            calls: AtomicUsize::new(0),
            targets: Mutex::new(Vec::new()),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<OptimizationTarget> {
        self.targets.lock().clone()
    }

    pub fn outcomes(&self) -> Vec<BatchExecutionResult> {
        self.outcomes.lock().clone()
    }
}

impl PredictionProvider for FixedPredictor {
    fn predict_batch_size(
        &self,
        _features: &PredictionFeatures,
        target: &OptimizationTarget,
    ) -> Result<BatchPrediction, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().push(target.clone());
        match self.size {
            Some(batch_size) => Ok(BatchPrediction {
                batch_size,
                confidence: 0.9,
            }),
            None => Err(PredictionError::Unavailable {
                reason: "model not loaded".to_string(),
            }),
        }
    }

    fn record_outcome(&self, _features: &PredictionFeatures, result: &BatchExecutionResult) {
        self.outcomes.lock().push(result.clone());
    }
}
