//! Host resource sampling.

use crate::errors::MonitorError;
use crate::models::SystemResources;

/// Produces one resource snapshot per call.
pub trait ResourceSampler: Send + Sync {
    fn sample(&self) -> Result<SystemResources, MonitorError>;
}
