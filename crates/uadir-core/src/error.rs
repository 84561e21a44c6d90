//! Error types for `uadir-core`, plus the classification every store error
//! exposes to the API layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A write payload broke one of the directory's data rules.
  #[error("invalid input: {0}")]
  Validation(String),

  #[error("unknown {what}: {value:?}")]
  UnknownValue { what: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse category of a failure, independent of the backend that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The targeted expert (or other record) does not exist.
  NotFound,
  /// A required relationship is missing or a data rule / uniqueness
  /// constraint was violated. Not retryable.
  Constraint,
  /// The store could not be reached or was busy; a caller may retry.
  Unavailable,
  /// Anything else: corrupt rows, decoding failures, bugs.
  Internal,
}

/// Implemented by every store error so higher layers can translate failures
/// without knowing the backend.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Constraint,
      Self::UnknownValue { .. } => ErrorKind::Internal,
    }
  }
}
