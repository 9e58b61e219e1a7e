//! IDs de correlación entre contextos.
//!
//! Un ID entrante se etiqueta con el servicio que lo procesa
//! (`"{entrante}-producer-service"`); sin ID entrante se genera uno nuevo.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::identity;

pub const PRODUCER_SERVICE_SUFFIX: &str = "-producer-service";

/// Devuelve el ID de correlación con el que se procesará una petición.
pub fn for_producer_service(incoming: Option<&str>) -> String {
  match incoming.map(str::trim).filter(|s| !s.is_empty()) {
    Some(id) => format!("{id}{PRODUCER_SERVICE_SUFFIX}"),
    None => generate(),
  }
}

/// `producer-{millis}-{uuid}`.
pub fn generate() -> String {
  format!("producer-{}-{}", unix_millis(), identity::random_uuid().simple())
}

/// Quita el sufijo de servicio, si lo hay.
pub fn extract_original(correlation_id: &str) -> &str {
  correlation_id.strip_suffix(PRODUCER_SERVICE_SUFFIX).unwrap_or(correlation_id)
}

pub(crate) fn unix_millis() -> u128 {
  SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default()
}

pub(crate) fn unix_secs() -> u64 {
  SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn incoming_id_gets_suffix() {
    let id = for_producer_service(Some("req-123"));
    assert_eq!(id, "req-123-producer-service");
    assert_eq!(extract_original(&id), "req-123");
  }

  #[test]
  fn blank_incoming_generates() {
    for incoming in [None, Some(""), Some("   ")] {
      let id = for_producer_service(incoming);
      assert!(id.starts_with("producer-"), "{id}");
      assert!(!id.ends_with(PRODUCER_SERVICE_SUFFIX));
    }
  }

  #[test]
  fn generated_ids_are_unique() {
    assert_ne!(generate(), generate());
  }

  #[test]
  fn extract_without_suffix_is_identity() {
    assert_eq!(extract_original("abc"), "abc");
  }
}
