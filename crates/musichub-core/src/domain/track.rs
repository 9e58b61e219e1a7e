use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::domain::{
  artist_name::ArtistName,
  ids::ArtistId,
  isrc::Isrc,
  producer_code::ProducerCode,
  source::{Source, SourceType},
  status::VerificationStatus,
};
use crate::errors::ValidationError;

/// Crédito de un artista en una pista.
///
/// `artist_id` queda vacío mientras el contexto de artistas no lo resuelva.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistCredit {
  pub name: ArtistName,
  pub artist_id: Option<ArtistId>,
}

impl ArtistCredit {
  pub fn with_name(name: ArtistName) -> Self {
    ArtistCredit { name, artist_id: None }
  }
}

/// Pista dentro del agregado `Producer`.
///
/// La igualdad (y el hash) dependen sólo del ISRC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
  isrc: Isrc,
  title: String,
  artist_credits: Vec<ArtistCredit>,
  sources: Vec<Source>,
  status: VerificationStatus,
  /// Segundos UNIX del primer registro.
  registered_at: u64,
}

/// Datos nuevos para una pista existente, aportados por `source`.
///
/// Los campos `None` conservan el valor actual.
#[derive(Debug, Clone)]
pub struct TrackUpdate {
  pub source: Source,
  pub title: Option<String>,
  pub artist_credits: Option<Vec<ArtistCredit>>,
  pub status: Option<VerificationStatus>,
}

impl TrackUpdate {
  pub fn from_source(source: Source) -> Self {
    TrackUpdate { source, title: None, artist_credits: None, status: None }
  }
}

impl Track {
  /// Pista nueva en estado `Provisional`.
  pub fn new(
    isrc: Isrc,
    title: &str,
    artist_credits: Vec<ArtistCredit>,
    sources: Vec<Source>,
    registered_at: u64,
  ) -> Result<Self, ValidationError> {
    let title = validate_title(title)?;
    if sources.is_empty() {
      return Err(ValidationError::MissingSources);
    }

    Ok(Track {
      isrc,
      title,
      artist_credits,
      sources: dedup_sources(sources),
      status: VerificationStatus::Provisional,
      registered_at,
    })
  }

  /// Usado por los adaptadores de persistencia al reconstruir una pista.
  pub fn with_status(mut self, status: VerificationStatus) -> Self {
    self.status = status;
    self
  }

  pub fn isrc(&self) -> &Isrc {
    &self.isrc
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn artist_credits(&self) -> &[ArtistCredit] {
    &self.artist_credits
  }

  pub fn artist_names(&self) -> impl Iterator<Item = &ArtistName> {
    self.artist_credits.iter().map(|c| &c.name)
  }

  pub fn sources(&self) -> &[Source] {
    &self.sources
  }

  pub fn status(&self) -> VerificationStatus {
    self.status
  }

  pub fn registered_at(&self) -> u64 {
    self.registered_at
  }

  pub fn producer_code(&self) -> ProducerCode {
    self.isrc.producer_code()
  }

  /// Tipo de fuente más confiable entre las que respaldan la pista.
  pub fn highest_priority_source(&self) -> Option<SourceType> {
    self.sources.iter().map(Source::source_type).max_by_key(|t| t.priority())
  }

  /// Aplica datos de otra fuente según la jerarquía de fuente de verdad.
  ///
  /// - la fuente se añade siempre (si no estaba ya);
  /// - título, créditos y estado sólo cambian si la fuente nueva tiene
  ///   prioridad mayor o igual que la mejor fuente actual;
  /// - una fuente `MANUAL` verifica la pista;
  /// - el estado nunca retrocede.
  pub fn apply_update(&mut self, update: TrackUpdate) -> Result<(), ValidationError> {
    let incoming = update.source.source_type();
    let current_best = self.highest_priority_source().map(|t| t.priority()).unwrap_or(0);
    let wins = incoming.priority() >= current_best;

    let title = match (&update.title, wins) {
      (Some(t), true) => Some(validate_title(t)?),
      _ => None,
    };

    if !self.sources.contains(&update.source) {
      self.sources.push(update.source);
    }

    if wins {
      if let Some(title) = title {
        self.title = title;
      }
      if let Some(credits) = update.artist_credits {
        self.artist_credits = credits;
      }
      if let Some(status) = update.status {
        self.status = self.status.promoted_by(status);
      }
    }

    if incoming == SourceType::Manual {
      self.status = VerificationStatus::Verified;
    }

    Ok(())
  }
}

impl PartialEq for Track {
  fn eq(&self, other: &Self) -> bool {
    self.isrc == other.isrc
  }
}

impl Eq for Track {}

impl Hash for Track {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.isrc.hash(state);
  }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::BlankTitle);
  }
  Ok(trimmed.to_string())
}

fn dedup_sources(sources: Vec<Source>) -> Vec<Source> {
  let mut out: Vec<Source> = Vec::with_capacity(sources.len());
  for s in sources {
    if !out.contains(&s) {
      out.push(s);
    }
  }
  out
}

/// Vista de lectura para el listado de pistas recientes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
  pub isrc: Isrc,
  pub title: String,
  pub producer_code: ProducerCode,
  pub artist_names: Vec<String>,
  pub status: VerificationStatus,
  pub registered_at: u64,
}

impl TrackInfo {
  pub fn from_track(track: &Track) -> Self {
    TrackInfo {
      isrc: track.isrc.clone(),
      title: track.title.clone(),
      producer_code: track.producer_code(),
      artist_names: track.artist_names().map(|n| n.as_str().to_string()).collect(),
      status: track.status,
      registered_at: track.registered_at,
    }
  }
}
