use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{Artist, ArtistId, ExternalArtist, Source, SourceType};
use crate::errors::{CoreError, ValidationError};
use crate::ports::{ArtistReconciliationPort, ArtistRepository, PortError};

/// Reconciliador de fuente de verdad.
///
/// Sube de nivel a un artista provisional consultando las plataformas en el
/// orden de [`SourceType::HIERARCHY`], **una a una**, y se queda con la
/// primera que responde. Nunca se consulta una fuente de menor prioridad si
/// otra de mayor prioridad ya respondió.
///
/// Los fallos de una plataforma (error o timeout) se registran y cuentan como
/// "sin resultado": el recorrido sigue con la siguiente.
pub struct ArtistEnrichmentService<R>
where
  R: ArtistRepository,
{
  repo: R,
  ports: BTreeMap<SourceType, Arc<dyn ArtistReconciliationPort>>,
  lookup_timeout: Option<Duration>,
}

impl<R> ArtistEnrichmentService<R>
where
  R: ArtistRepository,
{
  /// Indexa los ports por tipo de fuente. Dos ports para el mismo tipo es
  /// un error de configuración.
  pub fn new(repo: R, ports: Vec<Arc<dyn ArtistReconciliationPort>>) -> Result<Self, ValidationError> {
    let mut by_type: BTreeMap<SourceType, Arc<dyn ArtistReconciliationPort>> = BTreeMap::new();
    for source_type in SourceType::HIERARCHY {
      for port in ports.iter().filter(|p| p.supports(source_type)) {
        if by_type.insert(source_type, Arc::clone(port)).is_some() {
          return Err(ValidationError::DuplicateReconciliationPort(source_type));
        }
      }
    }
    Ok(Self { repo, ports: by_type, lookup_timeout: None })
  }

  /// Tiempo máximo por consulta externa; al vencer cuenta como "sin resultado".
  pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
    self.lookup_timeout = Some(timeout);
    self
  }

  /// Tipos de fuente con un port registrado, en orden de prioridad.
  pub fn registered_sources(&self) -> Vec<SourceType> {
    SourceType::HIERARCHY.into_iter().filter(|t| self.ports.contains_key(t)).collect()
  }

  /// Enriquece un artista provisional por nombre.
  ///
  /// Un artista ya verificado se devuelve tal cual. Si ninguna fuente
  /// responde, el artista sigue provisional y no se guarda nada.
  pub async fn enrich(&self, mut artist: Artist) -> Result<Artist, CoreError> {
    if artist.status().is_verified() {
      debug!(artist_id = %artist.id(), "artist already verified; skipping enrichment");
      return Ok(artist);
    }

    for source_type in SourceType::HIERARCHY {
      let Some(port) = self.ports.get(&source_type) else {
        continue;
      };

      let found = self.guarded(source_type, port.find_artist_by_name(artist.name(), source_type)).await;
      if let Some(external) = found {
        info!(artist_id = %artist.id(), %source_type, "artist matched upstream");
        artist.merge(external);
        return self.save(&artist);
      }
    }

    debug!(artist_id = %artist.id(), name = %artist.name(), "no source matched; artist stays provisional");
    Ok(artist)
  }

  /// Carga el artista y lo enriquece.
  pub async fn enrich_by_id(&self, id: ArtistId) -> Result<Artist, CoreError> {
    let artist = self.load(id)?;
    self.enrich(artist).await
  }

  /// Enriquece un artista a partir de un ID externo concreto.
  ///
  /// Se pregunta sólo al port del tipo de `source`. La fuente pedida queda
  /// registrada en el artista si la plataforma la reconoce.
  pub async fn enrich_from_source(&self, id: ArtistId, source: Source) -> Result<Artist, CoreError> {
    let mut artist = self.load(id)?;
    let source_type = source.source_type();

    let Some(port) = self.ports.get(&source_type) else {
      warn!(artist_id = %id, %source_type, "no reconciliation port registered for source");
      return Ok(artist);
    };

    let found = self.guarded(source_type, port.find_artist_by_external_id(source.source_id(), source_type)).await;
    match found {
      Some(external) => {
        artist.merge(external);
        artist.record_source(source);
        self.save(&artist)
      }
      None => Ok(artist),
    }
  }

  async fn guarded<F>(&self, source_type: SourceType, lookup: F) -> Option<ExternalArtist>
  where
    F: Future<Output = Result<Option<ExternalArtist>, PortError>>,
  {
    let result = match self.lookup_timeout {
      Some(limit) => tokio::time::timeout(limit, lookup).await.unwrap_or(Err(PortError::Timeout)),
      None => lookup.await,
    };

    match result {
      Ok(found) => found,
      Err(e) => {
        warn!(%source_type, error = %e, "reconciliation lookup failed; treating as no match");
        None
      }
    }
  }

  fn load(&self, id: ArtistId) -> Result<Artist, CoreError> {
    self
      .repo
      .find_by_id(id)
      .map_err(|e| CoreError::persistence(format!("loading artist {id}"), e))?
      .ok_or_else(|| CoreError::NotFound(format!("artist {id}")))
  }

  fn save(&self, artist: &Artist) -> Result<Artist, CoreError> {
    self.repo.save(artist).map_err(|e| CoreError::persistence(format!("saving artist {}", artist.id()), e))
  }
}
