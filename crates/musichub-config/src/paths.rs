use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza todos los directorios bajo una misma raíz.
pub const BASE_DIR_ENV: &str = "MUSICHUB_BASE_DIR";

pub const CONFIG_FILE_NAME: &str = "musichub.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("missing section [{0}]")]
  MissingSection(String),
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de la aplicación.
///
/// Con `MUSICHUB_BASE_DIR` definido todo cuelga de esa raíz (`config/`,
/// `data/`, `cache/`); si no, se usan los directorios de la plataforma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicHubPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl MusicHubPaths {
  pub fn new() -> Result<Self, ConfigError> {
    let paths = match std::env::var(BASE_DIR_ENV) {
      Ok(base) if !base.trim().is_empty() => Self::under(base),
      _ => {
        let proj_dirs = ProjectDirs::from("com", "musichub", "musichub").ok_or(ConfigError::Directories)?;
        MusicHubPaths {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
          data_dir: proj_dirs.data_dir().to_path_buf(),
          cache_dir: proj_dirs.cache_dir().to_path_buf(),
        }
      }
    };

    paths.ensure_dirs()?;
    Ok(paths)
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  /// Estructura de directorios bajo `base`, sin tocar el disco.
  pub fn under(base: impl AsRef<Path>) -> Self {
    let base = base.as_ref();
    MusicHubPaths {
      base_dir: base.to_path_buf(),
      config_dir: base.join("config"),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
    }
  }

  pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
    std::fs::create_dir_all(&self.config_dir)?;
    std::fs::create_dir_all(&self.data_dir)?;
    std::fs::create_dir_all(&self.cache_dir)?;
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  struct EnvVarGuard {
    key: String,
    original: Option<String>,
  }

  impl EnvVarGuard {
    fn new(key: &str, value: &str) -> Self {
      let original = std::env::var(key).ok();
      unsafe { std::env::set_var(key, value) };
      EnvVarGuard { key: key.to_owned(), original }
    }
  }

  impl Drop for EnvVarGuard {
    fn drop(&mut self) {
      match &self.original {
        Some(val) => unsafe { std::env::set_var(&self.key, val) },
        None => unsafe { std::env::remove_var(&self.key) },
      }
    }
  }

  #[test]
  fn base_dir_override_creates_layout() {
    let tmp = tempdir().unwrap();
    let _env = EnvVarGuard::new(BASE_DIR_ENV, tmp.path().to_str().unwrap());

    let paths = MusicHubPaths::new().unwrap();

    assert_eq!(paths, MusicHubPaths::under(tmp.path()));
    assert!(paths.config_dir.exists());
    assert!(paths.data_dir.exists());
    assert!(paths.cache_dir.exists());
    assert_eq!(paths.config_file(), tmp.path().join("config").join("musichub.toml"));
  }

  #[test]
  fn under_does_not_touch_disk() {
    let tmp = tempdir().unwrap();
    let paths = MusicHubPaths::under(tmp.path().join("nowhere"));
    assert!(!paths.config_dir.exists());
  }
}
