use std::time::Duration;

use musichub_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

const SECTION: &str = "events";

/// Sección `[events]` de `musichub.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EventsConfig {
  /// Eventos que un suscriptor lento puede acumular antes de perder los más viejos.
  #[serde(default = "default_capacity")]
  pub capacity: usize,
  /// Límite por consulta de reconciliación. Sin valor, no hay límite.
  pub lookup_timeout_ms: Option<u64>,
}

fn default_capacity() -> usize {
  128
}

impl Default for EventsConfig {
  fn default() -> Self {
    EventsConfig { capacity: default_capacity(), lookup_timeout_ms: None }
  }
}

impl EventsConfig {
  pub fn lookup_timeout(&self) -> Option<Duration> {
    self.lookup_timeout_ms.map(Duration::from_millis)
  }

  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&*CONFIG_BACKEND)
  }

  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg: EventsConfig = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section(SECTION, self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use musichub_config::TomlConfigBackend;
  use tempfile::tempdir;

  #[test]
  fn defaults_when_file_is_missing() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("musichub.toml"));

    let cfg = EventsConfig::load_from(&backend).unwrap();
    assert_eq!(cfg, EventsConfig::default());
    assert_eq!(cfg.lookup_timeout(), None);
    assert!(backend.file().exists());
  }

  #[test]
  fn reads_timeout_in_millis() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("musichub.toml"));
    std::fs::write(backend.file(), "[events]\ncapacity = 16\nlookup_timeout_ms = 2500\n").unwrap();

    let cfg = EventsConfig::load_from(&backend).unwrap();
    assert_eq!(cfg.capacity, 16);
    assert_eq!(cfg.lookup_timeout(), Some(Duration::from_millis(2500)));
  }
}
