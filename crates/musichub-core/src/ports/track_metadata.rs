use serde::{Deserialize, Serialize};

use crate::domain::{Isrc, SourceType};
use crate::ports::PortError;

/// Metadatos de una pista devueltos por una plataforma musical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTrackMetadata {
  pub isrc: Isrc,
  pub title: String,
  /// En el orden de créditos de la plataforma.
  pub artist_names: Vec<String>,
  pub platform: SourceType,
  pub external_id: String,
}

/// Port para resolver un ISRC contra plataformas externas.
///
/// `Ok(None)` significa que ninguna plataforma conoce el ISRC; un `Err`
/// significa que no se pudo preguntar.
#[async_trait::async_trait]
pub trait TrackMetadataPort: Send + Sync {
  async fn find_track_by_isrc(&self, isrc: &Isrc) -> Result<Option<ExternalTrackMetadata>, PortError>;
}

#[async_trait::async_trait]
impl<T: TrackMetadataPort + ?Sized> TrackMetadataPort for std::sync::Arc<T> {
  async fn find_track_by_isrc(&self, isrc: &Isrc) -> Result<Option<ExternalTrackMetadata>, PortError> {
    (**self).find_track_by_isrc(isrc).await
  }
}
