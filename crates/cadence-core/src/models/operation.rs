use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of work. Payloads are opaque to the batching layer.
pub type Operation = serde_json::Value;

/// Kind of downstream operation. Engine state is tracked per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Read,
    Write,
    Delete,
    Update,
    BulkCreate,
    Query,
}

impl OperationType {
    pub const ALL: [OperationType; 6] = [
        Self::Read,
        Self::Write,
        Self::Delete,
        Self::Update,
        Self::BulkCreate,
        Self::Query,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::BulkCreate => "bulk_create",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
