/// Errors from a batch size prediction provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PredictionError {
    #[error("prediction model unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("insufficient training data: {samples} samples")]
    InsufficientData { samples: usize },

    #[error("prediction failed: {0}")]
    Failed(String),
}
