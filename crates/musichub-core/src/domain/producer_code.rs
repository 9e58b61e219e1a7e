use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::isrc::Isrc;
use crate::errors::ValidationError;

const PRODUCER_CODE_PATTERN: &str = r"^[A-Z]{2}[A-Z0-9]{3}$";

static PRODUCER_CODE_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new(PRODUCER_CODE_PATTERN).expect("invalid producer code pattern"));

/// Código de productor: país + registrante, los 5 primeros caracteres de un ISRC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProducerCode(String);

impl ProducerCode {
  /// Acepta un código de 5 caracteres o un ISRC completo de 12, que se
  /// trunca a sus 5 primeros. No normaliza mayúsculas ni espacios.
  pub fn new(raw: &str) -> Result<Self, ValidationError> {
    let candidate = match raw.chars().count() {
      5 => raw,
      12 => match raw.char_indices().nth(5) {
        Some((cut, _)) => &raw[..cut],
        None => raw,
      },
      _ => return Err(ValidationError::InvalidProducerCode { value: raw.to_string() }),
    };

    if PRODUCER_CODE_REGEX.is_match(candidate) {
      Ok(ProducerCode(candidate.to_string()))
    } else {
      Err(ValidationError::InvalidProducerCode { value: raw.to_string() })
    }
  }

  /// Un ISRC válido siempre contiene un código de productor válido.
  pub fn from_isrc(isrc: &Isrc) -> Self {
    ProducerCode(isrc.as_str()[..5].to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for ProducerCode {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ProducerCode::new(s)
  }
}

impl TryFrom<String> for ProducerCode {
  type Error = ValidationError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    ProducerCode::new(&value)
  }
}

impl From<ProducerCode> for String {
  fn from(code: ProducerCode) -> Self {
    code.0
  }
}

impl fmt::Display for ProducerCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
