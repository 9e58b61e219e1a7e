use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::ValidationError;

/// Plataforma de origen de un dato.
///
/// El orden de declaración es la jerarquía de fuente de verdad, de mayor a
/// menor prioridad: `MANUAL > TIDAL > SPOTIFY > DEEZER > APPLE_MUSIC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
  /// Introducido a mano por una persona; siempre gana.
  Manual,
  Tidal,
  Spotify,
  Deezer,
  AppleMusic,
}

impl SourceType {
  /// Jerarquía completa, de mayor a menor prioridad.
  pub const HIERARCHY: [SourceType; 5] =
    [SourceType::Manual, SourceType::Tidal, SourceType::Spotify, SourceType::Deezer, SourceType::AppleMusic];

  /// Prioridad numérica: cuanto mayor, más confiable.
  pub fn priority(self) -> u8 {
    match self {
      SourceType::Manual => 5,
      SourceType::Tidal => 4,
      SourceType::Spotify => 3,
      SourceType::Deezer => 2,
      SourceType::AppleMusic => 1,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      SourceType::Manual => "MANUAL",
      SourceType::Tidal => "TIDAL",
      SourceType::Spotify => "SPOTIFY",
      SourceType::Deezer => "DEEZER",
      SourceType::AppleMusic => "APPLE_MUSIC",
    }
  }
}

impl FromStr for SourceType {
  type Err = ValidationError;

  /// Sin distinguir mayúsculas: `"spotify"`, `"Spotify"` y `"SPOTIFY"` valen.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "MANUAL" => Ok(SourceType::Manual),
      "TIDAL" => Ok(SourceType::Tidal),
      "SPOTIFY" => Ok(SourceType::Spotify),
      "DEEZER" => Ok(SourceType::Deezer),
      "APPLE_MUSIC" => Ok(SourceType::AppleMusic),
      _ => Err(ValidationError::UnknownSourceType(s.to_string())),
    }
  }
}

impl fmt::Display for SourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Referencia a una entidad en una plataforma externa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
  source_type: SourceType,
  source_id: String,
}

impl Source {
  pub fn new(source_type: SourceType, source_id: &str) -> Result<Self, ValidationError> {
    let trimmed = source_id.trim();
    if trimmed.is_empty() {
      return Err(ValidationError::BlankSourceId);
    }
    Ok(Source { source_type, source_id: trimmed.to_string() })
  }

  /// Atajo para entrada manual.
  pub fn manual(source_id: &str) -> Result<Self, ValidationError> {
    Source::new(SourceType::Manual, source_id)
  }

  pub fn source_type(&self) -> SourceType {
    self.source_type
  }

  pub fn source_id(&self) -> &str {
    &self.source_id
  }
}

impl fmt::Display for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.source_type, self.source_id)
  }
}
