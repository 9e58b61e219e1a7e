use musichub_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SECTION: &str = "storage";

/// Sección `[storage]` de `musichub.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  /// Espera máxima de SQLite ante un bloqueo de escritura.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u32,
  #[serde(default = "default_max_connections")]
  pub max_connections: u32,
}

fn default_busy_timeout_ms() -> u32 {
  5_000
}

fn default_max_connections() -> u32 {
  8
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig::in_dir(&PATHS.data_dir)
  }
}

impl StorageConfig {
  /// Base de datos `musichub.db` dentro de `dir`, resto por defecto.
  pub fn in_dir(dir: &Path) -> Self {
    StorageConfig {
      db_path: dir.join("musichub.db"),
      journal_mode: Some("WAL".to_string()),
      busy_timeout_ms: default_busy_timeout_ms(),
      max_connections: default_max_connections(),
    }
  }

  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&*CONFIG_BACKEND)
  }

  /// Carga la sección (o los valores por defecto) y la vuelve a escribir
  /// para que el archivo documente todos los campos.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg: StorageConfig = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section(SECTION, self)
  }
}
