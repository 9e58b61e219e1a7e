use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{
  ids::ProducerId,
  isrc::Isrc,
  producer_code::ProducerCode,
  track::{Track, TrackUpdate},
};
use crate::errors::ValidationError;

/// Productor (sello / registrante): raíz de agregado dueña de las pistas
/// cuyo ISRC empieza por su código.
///
/// Invariantes:
/// - no hay dos pistas con el mismo ISRC;
/// - todas las pistas derivan el mismo `ProducerCode` que el productor.
///
/// El agregado recuerda qué pistas añadió o modificó desde que se creó o se
/// cargó. Los repositorios sólo escriben esas pistas, y rechazan con
/// `Conflict` una pista "nueva" que otro escritor ya insertó.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
  id: ProducerId,
  producer_code: ProducerCode,
  name: Option<String>,
  /// En orden de registro.
  tracks: Vec<Track>,
  #[serde(skip)]
  added: BTreeSet<Isrc>,
  #[serde(skip)]
  changed: BTreeSet<Isrc>,
}

impl PartialEq for Producer {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.producer_code == other.producer_code
      && self.name == other.name
      && self.tracks == other.tracks
  }
}

/// Resultado público de un registro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerSnapshot {
  pub id: ProducerId,
  pub producer_code: ProducerCode,
  pub name: Option<String>,
  pub tracks: BTreeSet<Isrc>,
}

impl Producer {
  /// Productor nuevo con identidad aleatoria, sin nombre ni pistas.
  pub fn create(producer_code: ProducerCode) -> Self {
    Producer {
      id: ProducerId::new(),
      producer_code,
      name: None,
      tracks: Vec::new(),
      added: BTreeSet::new(),
      changed: BTreeSet::new(),
    }
  }

  /// Reconstruye un productor persistido, revalidando sus invariantes.
  pub fn restore(
    id: ProducerId,
    producer_code: ProducerCode,
    name: Option<String>,
    tracks: Vec<Track>,
  ) -> Result<Self, ValidationError> {
    let mut producer = Producer {
      id,
      producer_code,
      name,
      tracks: Vec::with_capacity(tracks.len()),
      added: BTreeSet::new(),
      changed: BTreeSet::new(),
    };
    for track in tracks {
      producer.add_track(track)?;
    }
    producer.added.clear();
    Ok(producer)
  }

  pub fn id(&self) -> ProducerId {
    self.id
  }

  pub fn producer_code(&self) -> &ProducerCode {
    &self.producer_code
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// Un nombre vacío o sólo con espacios borra el nombre.
  pub fn rename(&mut self, name: Option<&str>) {
    self.name = name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string);
  }

  pub fn tracks(&self) -> &[Track] {
    &self.tracks
  }

  pub fn has_track(&self, isrc: &Isrc) -> bool {
    self.track(isrc).is_some()
  }

  pub fn track(&self, isrc: &Isrc) -> Option<&Track> {
    self.tracks.iter().find(|t| t.isrc() == isrc)
  }

  /// Añade la pista si su ISRC no existe todavía.
  ///
  /// Devuelve `true` sólo si la pista se insertó; repetir un ISRC es un
  /// no-op que devuelve `false`. Ese booleano decide si se publica el evento.
  pub fn add_track(&mut self, track: Track) -> Result<bool, ValidationError> {
    let code = track.producer_code();
    if code != self.producer_code {
      return Err(ValidationError::ProducerCodeMismatch {
        expected: self.producer_code.to_string(),
        found: code.to_string(),
      });
    }

    if self.has_track(track.isrc()) {
      return Ok(false);
    }
    self.added.insert(track.isrc().clone());
    self.tracks.push(track);
    Ok(true)
  }

  /// Pistas añadidas desde la carga; el repositorio debe insertarlas.
  pub fn added_tracks(&self) -> impl Iterator<Item = &Track> {
    self.tracks.iter().filter(|t| self.added.contains(t.isrc()))
  }

  /// Pistas ya persistidas que se modificaron desde la carga.
  pub fn changed_tracks(&self) -> impl Iterator<Item = &Track> {
    self.tracks.iter().filter(|t| self.changed.contains(t.isrc()) && !self.added.contains(t.isrc()))
  }

  /// Actualiza una pista existente según la jerarquía de fuentes.
  ///
  /// `Ok(None)` si el productor no tiene esa pista.
  pub fn update_track(&mut self, isrc: &Isrc, update: TrackUpdate) -> Result<Option<&Track>, ValidationError> {
    let Some(track) = self.tracks.iter_mut().find(|t| t.isrc() == isrc) else {
      return Ok(None);
    };
    track.apply_update(update)?;
    self.changed.insert(isrc.clone());
    Ok(Some(&*track))
  }

  pub fn snapshot(&self) -> ProducerSnapshot {
    ProducerSnapshot {
      id: self.id,
      producer_code: self.producer_code.clone(),
      name: self.name.clone(),
      tracks: self.tracks.iter().map(|t| t.isrc().clone()).collect(),
    }
  }
}
