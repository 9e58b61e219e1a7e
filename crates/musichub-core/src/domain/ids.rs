use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::{artist_name::ArtistName, isrc::Isrc, producer_code::ProducerCode};
use crate::identity::{self, ARTIST_NAMESPACE, PRODUCER_NAMESPACE, TRACK_NAMESPACE};

/// Newtype sobre `Uuid` con la API común de todos los IDs del dominio.
macro_rules! uuid_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(Uuid);

    impl $name {
      /// Identificador aleatorio (v4).
      pub fn new() -> Self {
        $name(identity::random_uuid())
      }

      pub fn from_uuid(u: Uuid) -> Self {
        $name(u)
      }

      pub fn as_uuid(&self) -> Uuid {
        self.0
      }
    }

    impl Default for $name {
      fn default() -> Self {
        Self::new()
      }
    }

    impl From<Uuid> for $name {
      fn from(u: Uuid) -> Self {
        $name(u)
      }
    }

    impl From<$name> for Uuid {
      fn from(id: $name) -> Self {
        id.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }
  };
}

uuid_id! {
  /// Identidad de un `Producer`.
  ///
  /// Los productores nuevos reciben un ID aleatorio; [`ProducerId::from_code`]
  /// da en cambio un ID estable para el mismo código, útil para correlacionar
  /// sin consultar el repositorio. La existencia real se decide siempre por
  /// código en el repositorio.
  ProducerId
}

uuid_id! {
  /// Identidad de un `Artist`, asignada al crearlo e inmutable después.
  ArtistId
}

uuid_id! {
  /// Identidad derivada de una pista. Mismo ISRC ⇒ mismo `TrackId`.
  TrackId
}

impl ProducerId {
  pub fn from_code(code: &ProducerCode) -> Self {
    ProducerId(identity::name_based_uuid(&PRODUCER_NAMESPACE, code.as_str()))
  }
}

impl ArtistId {
  pub fn from_name(name: &ArtistName) -> Self {
    ArtistId(identity::name_based_uuid(&ARTIST_NAMESPACE, name.as_str()))
  }
}

impl TrackId {
  pub fn from_isrc(isrc: &Isrc) -> Self {
    TrackId(identity::name_based_uuid(&TRACK_NAMESPACE, isrc.as_str()))
  }
}
