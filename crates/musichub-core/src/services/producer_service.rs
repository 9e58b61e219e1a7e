use std::time::Instant;

use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::correlation;
use crate::domain::{
  ArtistCredit, ArtistName, Isrc, Producer, ProducerCode, ProducerSnapshot, Source, Track, TrackInfo, TrackUpdate,
  TrackWasRegistered,
};
use crate::errors::{CoreError, ExternalServiceError, ValidationError};
use crate::identity;
use crate::ports::{
  ExternalTrackMetadata, MAX_RECENT_TRACKS, MessageChannel, ProducerRepository, RepoError, TrackMetadataPort,
};

/// Intentos de guardado cuando otro escritor crea el mismo productor a la vez.
pub const MAX_SAVE_ATTEMPTS: usize = 3;

const METADATA_SERVICE: &str = "track-metadata";

/// Casos de uso del contexto de productores.
pub struct ProducerService<R, M, C>
where
  R: ProducerRepository,
  M: TrackMetadataPort,
  C: MessageChannel,
{
  repo: R,
  metadata: M,
  channel: C,
}

impl<R, M, C> ProducerService<R, M, C>
where
  R: ProducerRepository,
  M: TrackMetadataPort,
  C: MessageChannel,
{
  pub fn new(repo: R, metadata: M, channel: C) -> Self {
    Self { repo, metadata, channel }
  }

  /// Registra una pista a partir de su ISRC.
  ///
  /// Orden:
  /// 1. validar el ISRC;
  /// 2. pedir metadatos externos (antes de tocar el productor, para que un
  ///    fallo externo nunca deje una pista a medias);
  /// 3. buscar o crear el productor por código;
  /// 4. añadir la pista (idempotente por ISRC);
  /// 5. guardar;
  /// 6. publicar `TrackWasRegistered` sólo si la pista es nueva y el guardado
  ///    terminó bien.
  pub async fn register_track(
    &self,
    raw_isrc: &str,
    correlation_id: Option<&str>,
  ) -> Result<ProducerSnapshot, CoreError> {
    let correlation_id = correlation::for_producer_service(correlation_id);
    let span = info_span!("register_track", correlation_id = %correlation_id, isrc = %raw_isrc);
    self.register_track_inner(raw_isrc, &correlation_id).instrument(span).await
  }

  async fn register_track_inner(&self, raw_isrc: &str, correlation_id: &str) -> Result<ProducerSnapshot, CoreError> {
    let started = Instant::now();

    let isrc = Isrc::normalized(raw_isrc)?;
    let code = isrc.producer_code();

    let metadata = self.fetch_metadata(&isrc).await?;
    let track = build_track(&isrc, metadata)?;

    if let Ok(key) = identity::hash_uuid(code.as_str()) {
      debug!(producer_code = %code, producer_key = %key, "resolving producer");
    }

    let mut attempt = 0;
    loop {
      attempt += 1;

      let mut producer = self
        .repo
        .find_by_code(&code)
        .map_err(|e| CoreError::persistence(format!("loading producer {code}"), e))?
        .unwrap_or_else(|| Producer::create(code.clone()));

      if !producer.add_track(track.clone())? {
        info!(
          producer_code = %code,
          elapsed_ms = started.elapsed().as_millis() as u64,
          "track already registered; nothing to publish"
        );
        return Ok(producer.snapshot());
      }

      match self.repo.save(&producer) {
        Ok(saved) => {
          self.publish(&track, &saved, correlation_id).await;
          info!(
            producer_code = %code,
            producer_id = %saved.id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "track registered"
          );
          return Ok(saved.snapshot());
        }
        Err(RepoError::Conflict(reason)) if attempt < MAX_SAVE_ATTEMPTS => {
          debug!(producer_code = %code, attempt, %reason, "producer changed concurrently; retrying");
        }
        Err(e) => return Err(CoreError::persistence(format!("saving producer {code}"), e)),
      }
    }
  }

  async fn fetch_metadata(&self, isrc: &Isrc) -> Result<ExternalTrackMetadata, CoreError> {
    let started = Instant::now();
    let result = self.metadata.find_track_by_isrc(isrc).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match result {
      Ok(Some(metadata)) => {
        debug!(elapsed_ms, platform = %metadata.platform, "track metadata resolved");
        Ok(metadata)
      }
      Ok(None) => {
        warn!(elapsed_ms, "no platform knows this ISRC");
        Err(ExternalServiceError::Unresolvable { isrc: isrc.to_string() }.into())
      }
      Err(e) => {
        warn!(elapsed_ms, error = %e, "track metadata lookup failed");
        Err(ExternalServiceError::Unavailable { service: METADATA_SERVICE.to_string(), reason: e.to_string() }.into())
      }
    }
  }

  async fn publish(&self, track: &Track, producer: &Producer, correlation_id: &str) {
    let event = TrackWasRegistered::from_track(track, producer.id(), Some(correlation_id));
    // El productor ya está guardado: un fallo aquí sólo se registra.
    if let Err(e) = self.channel.publish(event).await {
      error!(isrc = %track.isrc(), error = %e, "failed to publish TrackWasRegistered");
    }
  }

  /// Aplica datos de una fuente a una pista ya registrada.
  pub async fn update_track(&self, raw_isrc: &str, update: TrackUpdate) -> Result<Track, CoreError> {
    let isrc = Isrc::normalized(raw_isrc)?;
    let code = isrc.producer_code();
    let source_type = update.source.source_type();

    let mut producer = self
      .repo
      .find_by_code(&code)
      .map_err(|e| CoreError::persistence(format!("loading producer {code}"), e))?
      .ok_or_else(|| CoreError::NotFound(format!("producer {code}")))?;

    let updated = producer
      .update_track(&isrc, update)?
      .cloned()
      .ok_or_else(|| CoreError::NotFound(format!("track {isrc}")))?;

    self.repo.save(&producer).map_err(|e| CoreError::persistence(format!("saving producer {code}"), e))?;

    info!(%isrc, %source_type, status = %updated.status(), "track updated");
    Ok(updated)
  }

  pub async fn find_producer(&self, raw_code: &str) -> Result<Option<Producer>, CoreError> {
    let code = ProducerCode::new(raw_code)?;
    self.repo.find_by_code(&code).map_err(|e| CoreError::persistence(format!("loading producer {code}"), e))
  }

  pub async fn rename_producer(&self, raw_code: &str, name: Option<&str>) -> Result<ProducerSnapshot, CoreError> {
    let code = ProducerCode::new(raw_code)?;
    let mut producer = self
      .repo
      .find_by_code(&code)
      .map_err(|e| CoreError::persistence(format!("loading producer {code}"), e))?
      .ok_or_else(|| CoreError::NotFound(format!("producer {code}")))?;

    producer.rename(name);
    let saved =
      self.repo.save(&producer).map_err(|e| CoreError::persistence(format!("saving producer {code}"), e))?;
    Ok(saved.snapshot())
  }

  /// Últimas pistas registradas, `1 ≤ limit ≤ 100`.
  pub async fn recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, CoreError> {
    if limit == 0 || limit > MAX_RECENT_TRACKS {
      return Err(ValidationError::InvalidLimit { value: limit, max: MAX_RECENT_TRACKS }.into());
    }
    self.repo.find_recent_tracks(limit).map_err(|e| CoreError::persistence("listing recent tracks", e))
  }
}

fn build_track(isrc: &Isrc, metadata: ExternalTrackMetadata) -> Result<Track, CoreError> {
  let credits = metadata
    .artist_names
    .iter()
    .filter_map(|raw| match ArtistName::new(raw) {
      Ok(name) => Some(ArtistCredit::with_name(name)),
      Err(e) => {
        warn!(credit = %raw, error = %e, "dropping invalid artist credit");
        None
      }
    })
    .collect();

  let source = Source::new(metadata.platform, &metadata.external_id)?;
  Ok(Track::new(isrc.clone(), &metadata.title, credits, vec![source], correlation::unix_secs())?)
}
