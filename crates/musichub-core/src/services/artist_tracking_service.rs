use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use crate::domain::{Artist, ArtistId, ArtistName, Contribution, Isrc, TrackWasRegistered};
use crate::errors::CoreError;
use crate::ports::{ArtistRepository, RepoError};
use crate::services::producer_service::MAX_SAVE_ATTEMPTS;

/// Resultado de procesar un `TrackWasRegistered`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrackingOutcome {
  /// Artistas creados por este evento (en estado `Provisional`).
  pub created: Vec<ArtistId>,
  /// Artistas ya existentes que recibieron la referencia.
  pub updated: Vec<ArtistId>,
  /// Créditos que no se pudieron procesar (nombre inválido o error de persistencia).
  pub skipped: usize,
}

/// Lado de artistas del flujo de registro: anota, por cada artista
/// acreditado, la pista recién registrada.
///
/// Cada artista se procesa por separado; un fallo en uno no afecta al resto.
pub struct ArtistTrackingService<R>
where
  R: ArtistRepository,
{
  repo: R,
}

impl<R> ArtistTrackingService<R>
where
  R: ArtistRepository,
{
  pub fn new(repo: R) -> Self {
    Self { repo }
  }

  pub async fn handle_track_registered(&self, event: &TrackWasRegistered) -> Result<TrackingOutcome, CoreError> {
    let isrc = Isrc::new(&event.isrc)?;
    let mut outcome = TrackingOutcome::default();
    let mut seen = BTreeSet::new();

    for raw in event.artist_names() {
      let name = match ArtistName::new(raw) {
        Ok(name) => name,
        Err(e) => {
          warn!(%isrc, credit = %raw, error = %e, "skipping invalid artist credit");
          outcome.skipped += 1;
          continue;
        }
      };
      if !seen.insert(name.clone()) {
        continue;
      }

      match self.record_track(&name, &isrc, &event.title) {
        Ok((artist, true)) => outcome.created.push(artist.id()),
        Ok((artist, false)) => outcome.updated.push(artist.id()),
        Err(e) => {
          error!(%isrc, artist = %name, error = %e, "failed to record track reference");
          outcome.skipped += 1;
        }
      }
    }

    info!(
      %isrc,
      created = outcome.created.len(),
      updated = outcome.updated.len(),
      skipped = outcome.skipped,
      "track references recorded"
    );
    Ok(outcome)
  }

  /// Busca o crea el artista y le añade la referencia y la contribución.
  ///
  /// Devuelve el artista guardado y si se creó en esta llamada.
  pub fn record_track(&self, name: &ArtistName, isrc: &Isrc, title: &str) -> Result<(Artist, bool), CoreError> {
    let mut attempt = 0;
    loop {
      attempt += 1;

      let existing =
        self.repo.find_by_name(name).map_err(|e| CoreError::persistence(format!("loading artist {name}"), e))?;
      let created = existing.is_none();
      let mut artist = existing.unwrap_or_else(|| Artist::create_provisional(name.clone()));

      let new_reference = artist.add_track_reference(isrc.clone());
      let new_contribution = artist.add_contribution(Contribution::new(isrc.clone(), title));
      if !created && !new_reference && !new_contribution {
        debug!(artist_id = %artist.id(), %isrc, "track already referenced");
        return Ok((artist, false));
      }

      match self.repo.save(&artist) {
        Ok(saved) => return Ok((saved, created)),
        Err(RepoError::Conflict(reason)) if attempt < MAX_SAVE_ATTEMPTS => {
          debug!(artist = %name, attempt, %reason, "artist changed concurrently; retrying");
        }
        Err(e) => return Err(CoreError::persistence(format!("saving artist {name}"), e)),
      }
    }
  }
}
