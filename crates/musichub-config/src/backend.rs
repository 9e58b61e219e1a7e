use crate::io::atomic_write_str;
use crate::paths::{ConfigError, MusicHubPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item};
use tracing::debug;

/// Almacén de configuración por secciones (`[storage]`, `[events]`…).
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  /// Como `load_section`, pero sin archivo o sin sección devuelve `T::default()`.
  fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    match self.load_section(section) {
      Ok(value) => Ok(value),
      Err(ConfigError::MissingSection(_)) => Ok(T::default()),
      Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
      Err(e) => Err(e),
    }
  }
}

/// Backend TOML sobre un único archivo (`musichub.toml`).
///
/// Las escrituras usan `toml_edit`, así que los comentarios y el orden que
/// haya puesto el usuario se conservan fuera de la sección reescrita.
pub struct TomlConfigBackend {
  file: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(paths: MusicHubPaths) -> Self {
    Self { file: paths.config_file() }
  }

  pub fn at(file: impl Into<PathBuf>) -> Self {
    Self { file: file.into() }
  }

  pub fn file(&self) -> &Path {
    &self.file
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(&self.file)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val.get(section).ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;

    table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc: DocumentMut = match fs::read_to_string(&self.file) {
      Ok(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?
      }
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // `toml::to_string` da "clave = valor" sin cabecera; se reparsea como
    // documento para insertarlo como tabla.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;
    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    doc[section] = section_item;

    atomic_write_str(&self.file, &doc.to_string())?;
    debug!(file = %self.file.display(), section, "config section saved");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Sample {
    capacity: usize,
    name: Option<String>,
  }

  #[test]
  fn missing_file_or_section_yields_default() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("musichub.toml"));

    let s: Sample = backend.load_section_with_default("events").unwrap();
    assert_eq!(s, Sample::default());

    fs::write(backend.file(), "[other]\nx = 1\n").unwrap();
    let s: Sample = backend.load_section_with_default("events").unwrap();
    assert_eq!(s, Sample::default());

    assert!(matches!(backend.load_section::<Sample>("events"), Err(ConfigError::MissingSection(_))));
  }

  #[test]
  fn save_preserves_comments_and_other_sections() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("musichub.toml"));
    fs::write(backend.file(), "# managed by hand\n[other]\nx = 1\n").unwrap();

    let value = Sample { capacity: 256, name: Some("bus".into()) };
    backend.save_section("events", &value).unwrap();

    let raw = fs::read_to_string(backend.file()).unwrap();
    assert!(raw.contains("# managed by hand"));
    assert!(raw.contains("[other]"));

    let back: Sample = backend.load_section("events").unwrap();
    assert_eq!(back, value);
  }

  #[test]
  fn malformed_section_is_an_error() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("musichub.toml"));
    fs::write(backend.file(), "[events]\ncapacity = \"lots\"\n").unwrap();

    assert!(matches!(backend.load_section_with_default::<Sample>("events"), Err(ConfigError::Other(_))));
  }
}
