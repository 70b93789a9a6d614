//! Error taxonomy for the synchronization layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vela_core::{ModelError, ParseError};
use vela_solver::{CopyError, SolverError};

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Conflicting factory sources or an operation unavailable in this mode.
    Configuration,
    /// Duplicate name or invalid re-bound.
    Conflict,
    /// No backend attached, or no solve has run.
    NotAttached,
    /// The cache changed since the last sync or solve.
    StaleMapping,
    /// The backend cannot represent part of the model.
    Copy,
    /// The requested value is not available.
    Precondition,
    /// Any other model validation failure.
    Model,
    /// The backend failed.
    Backend,
    /// Backend data has the wrong shape for its set.
    Decode,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotAttached => "not_attached",
            ErrorKind::StaleMapping => "stale_mapping",
            ErrorKind::Copy => "copy",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Model => "model",
            ErrorKind::Backend => "backend",
            ErrorKind::Decode => "decode",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Model`](crate::Model) and the controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("[SYNC_CONFIGURATION] {0}")]
    Configuration(String),
    #[error("[SYNC_NOT_ATTACHED] {0}")]
    NotAttached(String),
    #[error("[SYNC_STALE_MAPPING] {0}")]
    StaleMapping(String),
    #[error("[RESULT_PRECONDITION] {0}")]
    Precondition(String),
    #[error("[RESULT_DECODE] {set} values must have length {expected} (got {actual})")]
    Decode {
        set: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error(transparent)]
    Backend(#[from] SolverError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::NotAttached(_) => ErrorKind::NotAttached,
            Error::StaleMapping(_) => ErrorKind::StaleMapping,
            Error::Precondition(_) => ErrorKind::Precondition,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Model(err) if err.is_conflict() => ErrorKind::Conflict,
            Error::Model(_) | Error::Parse(_) => ErrorKind::Model,
            Error::Copy(_) => ErrorKind::Copy,
            Error::Backend(_) => ErrorKind::Backend,
        }
    }

    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "SYNC_CONFIGURATION",
            Error::NotAttached(_) => "SYNC_NOT_ATTACHED",
            Error::StaleMapping(_) => "SYNC_STALE_MAPPING",
            Error::Precondition(_) => "RESULT_PRECONDITION",
            Error::Decode { .. } => "RESULT_DECODE",
            Error::Model(err) => err.code(),
            Error::Parse(err) => err.code(),
            Error::Copy(err) => err.code(),
            Error::Backend(err) => err.code(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub(crate) fn not_attached(message: impl Into<String>) -> Self {
        Error::NotAttached(message.into())
    }

    pub(crate) fn stale(message: impl Into<String>) -> Self {
        Error::StaleMapping(message.into())
    }

    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }
}
