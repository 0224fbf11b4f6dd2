//! Operation kinds served by a model endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three cached operations of a model endpoint.
///
/// Each kind gets its own cache; the kind is also part of every
/// [`Fingerprint`](crate::cache::Fingerprint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Predict,
    Interpret,
    Attack,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Predict => "predict",
            Self::Interpret => "interpret",
            Self::Attack => "attack",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
