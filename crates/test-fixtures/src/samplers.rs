use std::collections::VecDeque;

use parking_lot::Mutex;

use cadence_core::errors::MonitorError;
use cadence_core::models::SystemResources;
use cadence_core::traits::ResourceSampler;

/// Returns queued results in order, then fails once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedSampler {
    script: Mutex<VecDeque<Result<SystemResources, MonitorError>>>,
}

impl ScriptedSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: SystemResources) {
        self.script.lock().push_back(Ok(sample));
    }

    pub fn push_failure(&self, reason: &str) {
        self.script.lock().push_back(Err(MonitorError::CollectionFailed {
            reason: reason.to_string(),
        }));
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl ResourceSampler for ScriptedSampler {
    fn sample(&self) -> Result<SystemResources, MonitorError> {
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(MonitorError::CollectionFailed {
                    reason: "script exhausted".to_string(),
                })
            })
    }
}
