use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ValidationError;

pub const MAX_ARTIST_NAME_LEN: usize = 255;

/// Nombre de artista, recortado, no vacío y de como mucho 255 caracteres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtistName(String);

impl ArtistName {
  pub fn new(raw: &str) -> Result<Self, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(ValidationError::InvalidArtistName { reason: "name must not be blank" });
    }
    if trimmed.chars().count() > MAX_ARTIST_NAME_LEN {
      return Err(ValidationError::InvalidArtistName { reason: "name exceeds 255 characters" });
    }
    Ok(ArtistName(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for ArtistName {
  type Error = ValidationError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    ArtistName::new(&value)
  }
}

impl From<ArtistName> for String {
  fn from(name: ArtistName) -> Self {
    name.0
  }
}

impl fmt::Display for ArtistName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
