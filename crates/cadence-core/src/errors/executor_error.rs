/// Errors surfaced by a work executor for a single batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutorError {
    #[error("batch rejected by downstream: {reason}")]
    Rejected { reason: String },

    #[error("rate limited by downstream")]
    RateLimited,

    #[error("batch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("executor failure: {0}")]
    Other(String),
}
