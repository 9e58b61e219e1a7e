pub mod artist_repository;
pub mod message_channel;
pub mod producer_repository;
pub mod reconciliation;
pub mod track_metadata;

pub use artist_repository::ArtistRepository;
pub use message_channel::{MessageChannel, TRACK_REGISTERED_CHANNEL};
pub use producer_repository::{MAX_RECENT_TRACKS, ProducerRepository};
pub use reconciliation::ArtistReconciliationPort;
pub use track_metadata::{ExternalTrackMetadata, TrackMetadataPort};

/// Error de un repositorio.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,

  /// Violación de unicidad: otro escritor creó antes la misma fila
  /// (mismo código de productor o mismo nombre de artista).
  #[error("uniqueness conflict: {0}")]
  Conflict(String),

  #[error("storage error: {0}")]
  Storage(String),
}

/// Error de un colaborador externo (plataforma, canal de mensajes).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
  #[error("unavailable: {0}")]
  Unavailable(String),

  #[error("timed out")]
  Timeout,

  #[error("invalid response: {0}")]
  InvalidResponse(String),
}
