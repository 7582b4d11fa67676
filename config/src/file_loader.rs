//! # YAML File Loading
//!
//! Reads and writes the backing YAML document. The top level of the document
//! must be a mapping; an empty file reads as an empty mapping.

use errors::ConfigError;
use serde_yaml::{Mapping, Value};
use std::fs::OpenOptions;
use std::path::Path;
use std::time::SystemTime;

/// Create `path` if it does not exist and bump its modification time.
pub fn touch(path: &Path) -> Result<(), ConfigError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| io_error(path, source))?;
    file.set_modified(SystemTime::now())
        .map_err(|source| io_error(path, source))
}

/// Parse YAML text into a top-level mapping.
///
/// `path` is only used for error messages.
pub fn parse_mapping(contents: &str, path: &Path) -> Result<Mapping, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(contents).map_err(|e| ConfigError::YamlParse {
        path: path.to_path_buf(),
        reason: e.to_string()
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf()
        })
    }
}

/// Load a YAML mapping from file, creating the file if it is absent.
///
/// ## Error Handling
/// Returns `ConfigError` for:
/// - File cannot be created or read
/// - Invalid YAML syntax
/// - Top-level value that is not a mapping
pub fn load_mapping(path: &Path) -> Result<Mapping, ConfigError> {
    touch(path)?;
    let contents = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    parse_mapping(&contents, path)
}

/// Serialize `mapping` and replace the contents of `path` with it.
pub fn write_mapping(path: &Path, mapping: &Mapping) -> Result<(), ConfigError> {
    let contents = serde_yaml::to_string(mapping).map_err(|e| ConfigError::YamlSerialize {
        reason: e.to_string()
    })?;
    std::fs::write(path, contents).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source
    }
}
