use crate::domain::{Producer, ProducerCode, TrackInfo};
use crate::ports::RepoError;

/// Límite superior de [`ProducerRepository::find_recent_tracks`].
pub const MAX_RECENT_TRACKS: usize = 100;

/// Persistencia del agregado `Producer`.
///
/// `save` recibe y devuelve el agregado completo; no hay carga perezosa.
/// Guardar un productor nuevo cuyo código ya pertenece a otro `ProducerId`
/// debe fallar con [`RepoError::Conflict`].
///
/// Sólo se escriben las pistas que el agregado marca como añadidas o
/// modificadas. Una pista añadida que ya existe en el almacén es un
/// [`RepoError::Conflict`]: otro escritor la registró primero. Al modificar
/// una pista, el estado nunca retrocede y las fuentes se acumulan.
pub trait ProducerRepository: Send + Sync {
  fn find_by_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError>;

  fn save(&self, producer: &Producer) -> Result<Producer, RepoError>;

  /// Pistas de cualquier productor, la más reciente primero.
  fn find_recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError>;
}

impl<T: ProducerRepository + ?Sized> ProducerRepository for std::sync::Arc<T> {
  fn find_by_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    (**self).find_by_code(code)
  }

  fn save(&self, producer: &Producer) -> Result<Producer, RepoError> {
    (**self).save(producer)
  }

  fn find_recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    (**self).find_recent_tracks(limit)
  }
}
