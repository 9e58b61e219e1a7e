use crate::domain::{Artist, ArtistId, ArtistName};
use crate::ports::RepoError;

/// Persistencia del agregado `Artist`.
///
/// El nombre es único: guardar un artista nuevo con un nombre que ya tiene
/// otro `ArtistId` falla con [`RepoError::Conflict`].
///
/// Para un mismo id las escrituras se fusionan: referencias, contribuciones
/// y fuentes se acumulan, el estado nunca retrocede y el nombre sólo se
/// sobrescribe si el agregado viene renombrado ([`Artist::is_renamed`]).
pub trait ArtistRepository: Send + Sync {
  fn find_by_name(&self, name: &ArtistName) -> Result<Option<Artist>, RepoError>;

  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError>;

  fn save(&self, artist: &Artist) -> Result<Artist, RepoError>;
}

impl<T: ArtistRepository + ?Sized> ArtistRepository for std::sync::Arc<T> {
  fn find_by_name(&self, name: &ArtistName) -> Result<Option<Artist>, RepoError> {
    (**self).find_by_name(name)
  }

  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    (**self).find_by_id(id)
  }

  fn save(&self, artist: &Artist) -> Result<Artist, RepoError> {
    (**self).save(artist)
  }
}
