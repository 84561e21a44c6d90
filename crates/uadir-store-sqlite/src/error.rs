//! Error type for `uadir-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;
use uadir_core::{Classify, ErrorKind};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] uadir_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decode error: {0}")]
  Decode(String),

  #[error("expert not found: {0}")]
  ExpertNotFound(Uuid),

  #[error("city {0} does not exist")]
  CityNotFound(i64),

  #[error("expert {0} is not an individual; publications belong to individuals")]
  NotAnIndividual(Uuid),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    Self::Database(tokio_rusqlite::Error::Rusqlite(e))
  }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::ExpertNotFound(_) => ErrorKind::NotFound,
      Self::CityNotFound(_) | Self::NotAnIndividual(_) => ErrorKind::Constraint,
      Self::Database(tokio_rusqlite::Error::Rusqlite(e)) => classify_sqlite(e),
      Self::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        ErrorKind::Unavailable
      }
      Self::Database(_) | Self::Uuid(_) | Self::Decode(_) => ErrorKind::Internal,
    }
  }
}

fn classify_sqlite(e: &rusqlite::Error) -> ErrorKind {
  match e.sqlite_error_code() {
    Some(ErrorCode::ConstraintViolation) => ErrorKind::Constraint,
    Some(
      ErrorCode::DatabaseBusy
      | ErrorCode::DatabaseLocked
      | ErrorCode::CannotOpen
      | ErrorCode::SystemIoFailure,
    ) => ErrorKind::Unavailable,
    _ => ErrorKind::Internal,
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
