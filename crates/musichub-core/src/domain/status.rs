use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::ValidationError;

/// Estado de verificación de un agregado o de una pista.
///
/// `Provisional < Verified`: el estado sólo avanza, nunca retrocede.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
  #[default]
  Provisional,
  Verified,
}

impl VerificationStatus {
  /// Combina dos estados sin retroceder nunca.
  pub fn promoted_by(self, other: VerificationStatus) -> VerificationStatus {
    self.max(other)
  }

  pub fn is_verified(self) -> bool {
    self == VerificationStatus::Verified
  }

  pub fn as_str(self) -> &'static str {
    match self {
      VerificationStatus::Provisional => "PROVISIONAL",
      VerificationStatus::Verified => "VERIFIED",
    }
  }
}

impl FromStr for VerificationStatus {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "PROVISIONAL" => Ok(VerificationStatus::Provisional),
      "VERIFIED" => Ok(VerificationStatus::Verified),
      _ => Err(ValidationError::UnknownStatus(s.to_string())),
    }
  }
}

impl fmt::Display for VerificationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn never_regresses() {
    use VerificationStatus::*;
    assert_eq!(Verified.promoted_by(Provisional), Verified);
    assert_eq!(Provisional.promoted_by(Verified), Verified);
    assert_eq!(Provisional.promoted_by(Provisional), Provisional);
  }

  #[test]
  fn round_trips_through_text() {
    assert_eq!("verified".parse::<VerificationStatus>().unwrap(), VerificationStatus::Verified);
    assert_eq!(VerificationStatus::Provisional.to_string(), "PROVISIONAL");
  }
}
