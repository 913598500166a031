use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

/// Returns the path if it is absolute, otherwise transform it into a
/// absolute path by appending it to the current working directory.
pub fn abs_or_relative(path: &Path) -> std::io::Result<PathBuf> {
    abs_or_relative_to(&std::env::current_dir()?, path)
}

pub fn abs_or_relative_to(dir: &Path, path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(dir.join(path))
}

/// Path of the `index`th numbered file in a series, i.e. `<dir>/<prefix>_<index>.<extension>`.
pub fn numbered(dir: &Path, prefix: &str, index: usize, extension: &str) -> PathBuf {
    dir.join(format!("{prefix}_{index}.{extension}"))
}

/// Deserialize data from toml file.
pub fn import_toml<T: DeserializeOwned>(path: &Path) -> std::io::Result<T> {
    let string = std::fs::read_to_string(path)?;
    toml::from_str(&string).map_err(std::io::Error::other)
}

/// Serialize data to toml file, creating parent directories as needed.
pub fn export_toml<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let string = toml::to_string_pretty(value).map_err(std::io::Error::other)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, string)
}
