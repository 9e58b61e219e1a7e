use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{
  artist_name::ArtistName,
  ids::{ArtistId, TrackId},
  isrc::Isrc,
  source::{Source, SourceType},
  status::VerificationStatus,
};

/// Registro desnormalizado de una pista en la que participó el artista.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contribution {
  pub track_id: TrackId,
  pub title: String,
  pub isrc: Isrc,
}

impl Contribution {
  pub fn new(isrc: Isrc, title: impl Into<String>) -> Self {
    Contribution { track_id: TrackId::from_isrc(&isrc), title: title.into(), isrc }
  }
}

/// Lo que una plataforma externa sabe de un artista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalArtist {
  pub name: ArtistName,
  pub status: VerificationStatus,
  pub sources: Vec<Source>,
}

/// Artista: raíz de agregado del contexto de artistas.
///
/// La identidad se asigna al crearlo y no cambia nunca. Las referencias a
/// pistas tienen semántica de conjunto.
///
/// Estado, fuentes, referencias y contribuciones sólo crecen, también en los
/// repositorios. El nombre es lo único que se sobrescribe, y sólo cuando el
/// agregado lo cambió con [`Artist::merge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
  id: ArtistId,
  name: ArtistName,
  status: VerificationStatus,
  track_references: BTreeSet<Isrc>,
  sources: Vec<Source>,
  contributions: Vec<Contribution>,
  #[serde(skip)]
  renamed: bool,
}

impl PartialEq for Artist {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.name == other.name
      && self.status == other.status
      && self.track_references == other.track_references
      && self.sources == other.sources
      && self.contributions == other.contributions
  }
}

impl Eq for Artist {}

impl Artist {
  /// Artista recién descubierto en un crédito: `Provisional`, sin fuentes.
  pub fn create_provisional(name: ArtistName) -> Self {
    Artist {
      id: ArtistId::new(),
      name,
      status: VerificationStatus::Provisional,
      track_references: BTreeSet::new(),
      sources: Vec::new(),
      contributions: Vec::new(),
      renamed: false,
    }
  }

  pub fn restore(
    id: ArtistId,
    name: ArtistName,
    status: VerificationStatus,
    track_references: BTreeSet<Isrc>,
    sources: Vec<Source>,
    contributions: Vec<Contribution>,
  ) -> Self {
    let mut artist = Artist {
      id,
      name,
      status,
      track_references,
      sources: Vec::new(),
      contributions: Vec::new(),
      renamed: false,
    };
    for s in sources {
      artist.record_source(s);
    }
    for c in contributions {
      artist.add_contribution(c);
    }
    artist
  }

  pub fn id(&self) -> ArtistId {
    self.id
  }

  pub fn name(&self) -> &ArtistName {
    &self.name
  }

  pub fn status(&self) -> VerificationStatus {
    self.status
  }

  pub fn track_references(&self) -> &BTreeSet<Isrc> {
    &self.track_references
  }

  pub fn sources(&self) -> &[Source] {
    &self.sources
  }

  pub fn contributions(&self) -> &[Contribution] {
    &self.contributions
  }

  /// `true` si `merge` cambió el nombre desde la carga.
  pub fn is_renamed(&self) -> bool {
    self.renamed
  }

  /// `true` si la referencia es nueva.
  pub fn add_track_reference(&mut self, isrc: Isrc) -> bool {
    self.track_references.insert(isrc)
  }

  /// Idempotente por ISRC: una segunda contribución para la misma pista se ignora.
  pub fn add_contribution(&mut self, contribution: Contribution) -> bool {
    if self.contributions.iter().any(|c| c.isrc == contribution.isrc) {
      return false;
    }
    self.contributions.push(contribution);
    true
  }

  pub fn has_source(&self, source_type: SourceType) -> bool {
    self.source(source_type).is_some()
  }

  pub fn source(&self, source_type: SourceType) -> Option<&Source> {
    self.sources.iter().find(|s| s.source_type() == source_type)
  }

  /// Marca el artista como verificado. `false` si ya lo estaba.
  pub fn verify(&mut self) -> bool {
    let changed = self.status == VerificationStatus::Provisional;
    self.status = VerificationStatus::Verified;
    changed
  }

  /// Fusiona el resultado de la fuente de mayor prioridad que respondió.
  ///
  /// Añade las fuentes que todavía no tiene, adopta el nombre externo y
  /// promociona a `Verified` si la fuente lo está. No elimina fuentes ni
  /// degrada el estado.
  pub fn merge(&mut self, external: ExternalArtist) {
    for source in external.sources {
      self.record_source(source);
    }
    if self.name != external.name {
      self.name = external.name;
      self.renamed = true;
    }
    self.status = self.status.promoted_by(external.status);
  }

  /// Añade la fuente si no está ya. Nunca sustituye ni elimina otras.
  pub fn record_source(&mut self, source: Source) -> bool {
    if self.sources.contains(&source) {
      return false;
    }
    self.sources.push(source);
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn name(raw: &str) -> ArtistName {
    ArtistName::new(raw).unwrap()
  }

  fn isrc(raw: &str) -> Isrc {
    Isrc::new(raw).unwrap()
  }

  #[test]
  fn new_artist_is_provisional_and_empty() {
    let a = Artist::create_provisional(name("The Testers"));
    assert_eq!(a.status(), VerificationStatus::Provisional);
    assert!(a.track_references().is_empty());
    assert!(a.sources().is_empty());
  }

  #[test]
  fn track_references_are_a_set() {
    let mut a = Artist::create_provisional(name("The Testers"));
    assert!(a.add_track_reference(isrc("DEU630901306")));
    assert!(!a.add_track_reference(isrc("DEU630901306")));
    assert!(a.add_track_reference(isrc("DEU630901307")));
    assert_eq!(a.track_references().len(), 2);
  }

  #[test]
  fn contributions_are_idempotent() {
    let mut a = Artist::create_provisional(name("The Testers"));
    assert!(a.add_contribution(Contribution::new(isrc("DEU630901306"), "Song")));
    assert!(!a.add_contribution(Contribution::new(isrc("DEU630901306"), "Song (Remaster)")));
    assert_eq!(a.contributions().len(), 1);
    assert_eq!(a.contributions()[0].track_id, TrackId::from_isrc(&isrc("DEU630901306")));
  }

  #[test]
  fn record_source_keeps_every_distinct_source() {
    let mut a = Artist::create_provisional(name("X"));
    assert!(a.record_source(Source::new(SourceType::Spotify, "old").unwrap()));
    assert!(a.record_source(Source::new(SourceType::Spotify, "new").unwrap()));
    assert!(!a.record_source(Source::new(SourceType::Spotify, "new").unwrap()));
    assert_eq!(a.sources().len(), 2);
    assert_eq!(a.source(SourceType::Spotify).unwrap().source_id(), "old");
  }

  #[test]
  fn merge_promotes_and_appends() {
    let mut a = Artist::create_provisional(name("the testers"));
    a.merge(ExternalArtist {
      name: name("The Testers"),
      status: VerificationStatus::Verified,
      sources: vec![Source::new(SourceType::Tidal, "tid-1").unwrap()],
    });
    assert_eq!(a.name().as_str(), "The Testers");
    assert!(a.is_renamed());
    assert_eq!(a.status(), VerificationStatus::Verified);
    assert!(a.has_source(SourceType::Tidal));
  }

  #[test]
  fn merge_never_downgrades_or_drops_sources() {
    let mut a = Artist::create_provisional(name("X"));
    a.record_source(Source::manual("curated").unwrap());
    a.verify();

    a.merge(ExternalArtist {
      name: name("X"),
      status: VerificationStatus::Provisional,
      sources: vec![Source::new(SourceType::Deezer, "dz").unwrap(), Source::manual("curated").unwrap()],
    });

    assert_eq!(a.status(), VerificationStatus::Verified);
    assert_eq!(a.sources().len(), 2);
    assert!(a.has_source(SourceType::Manual));
    assert!(!a.is_renamed());
  }
}
