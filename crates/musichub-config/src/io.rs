use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en un temporal hermano y lo renombra sobre `path`.
///
/// Un lector nunca ve el archivo a medio escribir. Crea el directorio padre
/// si no existe.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }

  let tmp_path = path.with_extension("toml.tmp");
  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)
}
