use crate::domain::{ArtistName, ExternalArtist, SourceType};
use crate::ports::PortError;

/// Port de reconciliación contra una plataforma externa (Tidal, Spotify…).
///
/// Cada tipo de fuente debe tener como mucho una implementación registrada;
/// el servicio de enriquecimiento lo comprueba al construirse.
#[async_trait::async_trait]
pub trait ArtistReconciliationPort: Send + Sync {
  fn supports(&self, source_type: SourceType) -> bool;

  async fn find_artist_by_name(
    &self,
    name: &ArtistName,
    source_type: SourceType,
  ) -> Result<Option<ExternalArtist>, PortError>;

  async fn find_artist_by_external_id(
    &self,
    external_id: &str,
    source_type: SourceType,
  ) -> Result<Option<ExternalArtist>, PortError>;
}
