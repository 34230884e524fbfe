use std::time::Duration;

use thiserror::Error;

/// Failure of an injected NLP/classification capability.
///
/// The profile builder never propagates these; they become
/// [`Degradation`](crate::Degradation) entries on the profile.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("{capability} unavailable: {message}")]
    Unavailable {
        capability: &'static str,
        message: String,
    },
    #[error("{capability} timed out after {timeout:?}")]
    TimedOut {
        capability: &'static str,
        timeout: Duration,
    },
}

impl CapabilityError {
    pub fn unavailable(capability: &'static str, message: impl Into<String>) -> Self {
        CapabilityError::Unavailable {
            capability,
            message: message.into(),
        }
    }

    pub fn capability(&self) -> &'static str {
        match self {
            CapabilityError::Unavailable { capability, .. }
            | CapabilityError::TimedOut { capability, .. } => capability,
        }
    }
}

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{0}' not found in CSV header")]
    MissingColumn(String),
    #[error("no documents found under {0}")]
    NoDocuments(String),
    /// A profile handed to the instruction compiler lacks one of the seven
    /// dimensions. This is a broken builder contract, not a data issue.
    #[error("profile for author '{author}' is missing the '{dimension}' dimension")]
    MissingDimension { author: String, dimension: String },
}

pub type Result<T> = std::result::Result<T, StyleError>;
