mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use paths::{BASE_DIR_ENV, CONFIG_FILE_NAME, ConfigError, MusicHubPaths};

use once_cell::sync::Lazy;

// Singleton de paths. Si no hay directorios de plataforma, modo portable
// bajo `./.musichub` (los directorios se crean al escribir).
pub static PATHS: Lazy<MusicHubPaths> = Lazy::new(|| match MusicHubPaths::detect() {
  Ok(paths) => paths,
  Err(e) => {
    tracing::warn!(error = %e, "falling back to portable paths under ./.musichub");
    MusicHubPaths::under(".musichub")
  }
});

// Singleton del backend de config
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
