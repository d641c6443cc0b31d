use std::fmt;

use serde::{Deserialize, Serialize};

/// Batch sizing policy. Sizing rules live in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStrategy {
    Conservative,
    Aggressive,
    #[default]
    Adaptive,
    Balanced,
}

impl BatchStrategy {
    /// Declaration order; also the tie-break order when ranking strategies.
    pub const ALL: [BatchStrategy; 4] = [
        Self::Conservative,
        Self::Aggressive,
        Self::Adaptive,
        Self::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Aggressive => "aggressive",
            Self::Adaptive => "adaptive",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for BatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
