use diesel::result::{DatabaseErrorKind, Error as DieselError};
use musichub_core::ports::RepoError;
use thiserror::Error;

/// Errores internos de los adaptadores de persistencia.
///
/// No salen del crate: en la frontera del port se convierten en [`RepoError`].
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("database error: {0}")]
  Diesel(#[from] DieselError),

  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),

  #[error("migration error: {0}")]
  Migration(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("corrupt row: {0}")]
  Corrupt(String),

  #[error("uniqueness conflict: {0}")]
  Conflict(String),

  #[error("invalid storage config: {0}")]
  InvalidConfig(String),
}

impl StorageError {
  pub fn corrupt(what: impl std::fmt::Display) -> Self {
    StorageError::Corrupt(what.to_string())
  }
}

impl From<StorageError> for RepoError {
  fn from(e: StorageError) -> Self {
    match e {
      StorageError::Conflict(msg) => RepoError::Conflict(msg),
      StorageError::Diesel(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
        RepoError::Conflict(info.message().to_string())
      }
      StorageError::Diesel(DieselError::NotFound) => RepoError::NotFound,
      other => RepoError::Storage(other.to_string()),
    }
  }
}
