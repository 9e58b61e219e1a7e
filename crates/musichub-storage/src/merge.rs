//! Fusión de lo almacenado con lo que llega en un `save`, compartida por
//! ambos almacenes. Estado y fuentes sólo crecen.

use musichub_core::ValidationError;
use musichub_core::domain::{Artist, Track};

/// Título y créditos del escritor; estado promovido y fuentes unidas.
/// `registered_at` es siempre el almacenado.
pub(crate) fn track(stored: &Track, incoming: &Track) -> Result<Track, ValidationError> {
  let mut sources = stored.sources().to_vec();
  sources.extend(incoming.sources().iter().cloned());
  let merged = Track::new(
    stored.isrc().clone(),
    incoming.title(),
    incoming.artist_credits().to_vec(),
    sources,
    stored.registered_at(),
  )?;
  Ok(merged.with_status(stored.status().promoted_by(incoming.status())))
}

/// Las fuentes almacenadas conservan su posición y las nuevas van detrás.
/// El nombre sólo cambia si `incoming` viene renombrado.
pub(crate) fn artist(stored: &Artist, incoming: &Artist) -> Artist {
  let name = if incoming.is_renamed() { incoming.name() } else { stored.name() };

  let mut references = stored.track_references().clone();
  references.extend(incoming.track_references().iter().cloned());
  let mut sources = stored.sources().to_vec();
  sources.extend(incoming.sources().iter().cloned());
  let mut contributions = stored.contributions().to_vec();
  contributions.extend(incoming.contributions().iter().cloned());

  Artist::restore(
    stored.id(),
    name.clone(),
    stored.status().promoted_by(incoming.status()),
    references,
    sources,
    contributions,
  )
}
