// crates/musichub-core/src/errors.rs
use thiserror::Error;

use crate::domain::source::SourceType;
use crate::ports::RepoError;

/// Error de validación de un valor de dominio.
///
/// Siempre es local y terminal: nunca se reintenta y se devuelve tal cual
/// al llamador como un fallo de entrada del cliente.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("invalid ISRC format: '{value}'")]
  InvalidIsrc { value: String },

  #[error("invalid producer code: '{value}'")]
  InvalidProducerCode { value: String },

  #[error("invalid artist name: {reason}")]
  InvalidArtistName { reason: &'static str },

  #[error("source id must not be blank")]
  BlankSourceId,

  #[error("unsupported source type: '{0}'")]
  UnknownSourceType(String),

  #[error("unknown verification status: '{0}'")]
  UnknownStatus(String),

  #[error("track title must not be blank")]
  BlankTitle,

  #[error("a track needs at least one source")]
  MissingSources,

  #[error("track producer code {found} does not match aggregate producer code {expected}")]
  ProducerCodeMismatch { expected: String, found: String },

  #[error("limit must be between 1 and {max}, got {value}")]
  InvalidLimit { value: usize, max: usize },

  #[error("identity input must not be blank")]
  BlankIdentityInput,

  #[error("more than one reconciliation port registered for {0}")]
  DuplicateReconciliationPort(SourceType),
}

/// Fallo de un servicio externo (plataforma musical, reconciliación).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalServiceError {
  /// El ISRC es válido pero ninguna plataforma devolvió datos.
  #[error("no track metadata found upstream for ISRC {isrc}")]
  Unresolvable { isrc: String },

  /// La plataforma no respondió o respondió con un error.
  #[error("{service} unavailable: {reason}")]
  Unavailable { service: String, reason: String },
}

/// Clase de error, para que la capa exterior (HTTP, CLI…) decida el código
/// de respuesta sin tener que conocer cada variante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  Validation,
  ExternalService,
  Persistence,
  NotFound,
}

/// Error genérico del núcleo de MusicHub.
///
/// Las capas superiores deberían mapear este error a respuestas de usuario
/// o logs usando [`CoreError::kind`].
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("external service error: {0}")]
  ExternalService(#[from] ExternalServiceError),

  #[error("persistence error while {context}: {source}")]
  Persistence {
    context: String,
    #[source]
    source: RepoError,
  },

  #[error("not found: {0}")]
  NotFound(String),
}

impl CoreError {
  /// Envuelve un error de repositorio con el contexto de la operación.
  pub fn persistence(context: impl Into<String>, source: RepoError) -> Self {
    CoreError::Persistence { context: context.into(), source }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      CoreError::Validation(_) => ErrorKind::Validation,
      CoreError::ExternalService(_) => ErrorKind::ExternalService,
      CoreError::Persistence { .. } => ErrorKind::Persistence,
      CoreError::NotFound(_) => ErrorKind::NotFound,
    }
  }
}
