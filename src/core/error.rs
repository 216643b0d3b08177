use crate::core::firewall::{EntityKey, EntityKind};
use thiserror::Error;

/// Core error types for forticonf
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Structural failure in the configuration text. Aborts the parse.
    #[error("Malformed block at line {line}: {reason}")]
    MalformedBlock { line: usize, reason: String },

    /// Two entities of the same kind share a key
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),

    /// Lookup through the reference index failed
    #[error("{kind} {key} not found")]
    NotFound { kind: EntityKind, key: EntityKey },

    /// Configuration file could not be used
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBlock {
            line,
            reason: reason.into(),
        }
    }

    /// Source line of a structural failure, if this error has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedBlock { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Raised when building a reference index over entities whose keys collide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate {kind} key: {key}")]
pub struct DuplicateKeyError {
    pub kind: EntityKind,
    pub key: EntityKey,
}

pub type Result<T> = std::result::Result<T, Error>;
