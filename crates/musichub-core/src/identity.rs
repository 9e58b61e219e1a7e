//! Derivación de identificadores.
//!
//! Tres familias de IDs conviven en el sistema:
//! - aleatorios (UUID v4) para agregados nuevos,
//! - basados en nombre (UUID v5) para IDs reproducibles a partir de un código,
//! - un hash SHA-256 plegado a 128 bits para claves sintéticas de correlación.
//!
//! [`hash_uuid`] **no** es resistente a colisiones provocadas: sólo sirve para
//! claves de bajo riesgo (logs, correlación entre contextos), nunca como
//! identidad de seguridad.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Namespace para `ProducerId` derivado de un `ProducerCode`.
pub const PRODUCER_NAMESPACE: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440001);

/// Namespace para `ArtistId` derivado de un nombre.
pub const ARTIST_NAMESPACE: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440002);

/// Namespace para `TrackId` derivado de un ISRC.
pub const TRACK_NAMESPACE: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440003);

/// UUID v4 para agregados recién creados.
pub fn random_uuid() -> Uuid {
  Uuid::new_v4()
}

/// UUID v5: mismo `namespace` + mismo `name` ⇒ mismo resultado, en cualquier
/// proceso y tras cualquier reinicio.
pub fn name_based_uuid(namespace: &Uuid, name: &str) -> Uuid {
  Uuid::new_v5(namespace, name.as_bytes())
}

/// SHA-256 de `input`; los primeros 16 bytes se leen como dos `u64`
/// big-endian (bits altos, bits bajos).
pub fn hash_uuid(input: &str) -> Result<Uuid, ValidationError> {
  if input.trim().is_empty() {
    return Err(ValidationError::BlankIdentityInput);
  }

  let digest = Sha256::digest(input.as_bytes());
  let mut high = [0u8; 8];
  let mut low = [0u8; 8];
  high.copy_from_slice(&digest[..8]);
  low.copy_from_slice(&digest[8..16]);

  Ok(Uuid::from_u64_pair(u64::from_be_bytes(high), u64::from_be_bytes(low)))
}
