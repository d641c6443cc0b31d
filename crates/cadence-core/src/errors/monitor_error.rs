/// Resource sampling and export errors.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("resource collection failed: {reason}")]
    CollectionFailed { reason: String },

    #[error("failed to export snapshot to {path}: {reason}")]
    ExportFailed { path: String, reason: String },

    #[error("snapshot serialization failed: {reason}")]
    SerializationFailed { reason: String },
}
