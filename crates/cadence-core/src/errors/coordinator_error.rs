use crate::models::JobStatus;

/// Job submission and lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("job id already in use: {job_id}")]
    DuplicateJobId { job_id: String },

    #[error("job not found: {job_id}")]
    JobNotFound { job_id: String },

    #[error("job {job_id} is already {status}")]
    AlreadyTerminal { job_id: String, status: JobStatus },

    #[error("job {job_id} timed out after {timeout_secs}s")]
    JobTimedOut { job_id: String, timeout_secs: u64 },

    #[error("worker for job {job_id} panicked: {message}")]
    WorkerPanicked { job_id: String, message: String },

    #[error("job {job_id} cancelled with {skipped} operations unprocessed")]
    Cancelled { job_id: String, skipped: usize },
}
