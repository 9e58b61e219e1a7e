use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::producer_code::ProducerCode;
use crate::errors::ValidationError;

const ISRC_PATTERN: &str = r"^[A-Z]{2}[A-Z0-9]{3}[0-9]{7}$";

static ISRC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(ISRC_PATTERN).expect("invalid ISRC pattern"));

/// International Standard Recording Code.
///
/// 12 caracteres: país (2 letras), registrante (3 alfanuméricos), año (2
/// dígitos) y designación (5 dígitos). Una vez construido siempre es válido.
///
/// Dos formas de construirlo:
/// - [`Isrc::new`]: estricto, sólo quita guiones y espacios exteriores.
///   `"frla12400001"` se rechaza.
/// - [`Isrc::normalized`]: además pasa a mayúsculas. Es lo que usa el
///   registro de pistas sobre la entrada del usuario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isrc(String);

impl Isrc {
  pub fn new(raw: &str) -> Result<Self, ValidationError> {
    let candidate: String = raw.trim().chars().filter(|c| *c != '-').collect();
    Self::validate(candidate, raw)
  }

  pub fn normalized(raw: &str) -> Result<Self, ValidationError> {
    let candidate: String = raw.trim().chars().filter(|c| *c != '-').collect::<String>().to_uppercase();
    Self::validate(candidate, raw)
  }

  fn validate(candidate: String, raw: &str) -> Result<Self, ValidationError> {
    if ISRC_REGEX.is_match(&candidate) {
      Ok(Isrc(candidate))
    } else {
      Err(ValidationError::InvalidIsrc { value: raw.to_string() })
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Los 5 primeros caracteres identifican al productor/sello.
  pub fn producer_code(&self) -> ProducerCode {
    ProducerCode::from_isrc(self)
  }
}

impl FromStr for Isrc {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Isrc::new(s)
  }
}

impl TryFrom<String> for Isrc {
  type Error = ValidationError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Isrc::new(&value)
  }
}

impl From<Isrc> for String {
  fn from(isrc: Isrc) -> Self {
    isrc.0
  }
}

impl AsRef<str> for Isrc {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Isrc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_canonical_code() {
    let isrc = Isrc::new("FRLA12400001").unwrap();
    assert_eq!(isrc.as_str(), "FRLA12400001");
  }

  #[test]
  fn rejects_malformed_codes() {
    for raw in ["frla12400001", "FRLA1240000", "FR1A12400001", "", "FRLA124000011"] {
      assert!(
        matches!(Isrc::new(raw), Err(ValidationError::InvalidIsrc { .. })),
        "{raw:?} should be rejected"
      );
    }
  }

  #[test]
  fn strips_hyphens_and_whitespace() {
    let isrc = Isrc::new("  FR-LA1-24-00001 ").unwrap();
    assert_eq!(isrc.as_str(), "FRLA12400001");
  }

  #[test]
  fn normalized_uppercases() {
    let isrc = Isrc::normalized("fr-la1-24-00001").unwrap();
    assert_eq!(isrc.as_str(), "FRLA12400001");
    assert!(Isrc::normalized("fr1a12400001").is_err());
  }

  #[test]
  fn error_keeps_raw_input() {
    let err = Isrc::new("bad-isrc").unwrap_err();
    assert_eq!(err, ValidationError::InvalidIsrc { value: "bad-isrc".into() });
  }

  #[test]
  fn derives_producer_code() {
    let isrc = Isrc::new("FRLA12400001").unwrap();
    assert_eq!(isrc.producer_code().as_str(), "FRLA1");
  }

  #[test]
  fn serde_validates_on_the_way_in() {
    let isrc: Isrc = from_plain_string("DEU630901306").unwrap();
    assert_eq!(isrc.as_str(), "DEU630901306");
    assert!(from_plain_string::<Isrc>("nope").is_err());
  }

  fn from_plain_string<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, serde::de::value::Error> {
    use serde::de::IntoDeserializer;
    T::deserialize(raw.to_string().into_deserializer())
  }
}
