//! # YAML Store
//!
//! Schema-checked cache of the handson YAML document.
//!
//! The store owns the backing file path, the loaded document and a flag
//! recording whether the document has been read. The file is read once per
//! store; every later change is written back by rewriting the whole file
//! from the in-memory document.

use crate::file_loader;
use crate::schema::{self, REGION};
use errors::ConfigError;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Schema-validated YAML configuration cache.
///
/// ## Usage
/// ```rust,no_run
/// use config::YamlStore;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut store = YamlStore::new("aws.yaml");
///     store.probe_all()?;
///     let delegates = store.get_stanza("delegates")?;
///     println!("delegates: {:?}", delegates);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct YamlStore {
    path: Option<PathBuf>,
    cache: Mapping,
    populated: bool
}

impl YamlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Set the backing file path.
    ///
    /// Setting the path that is already configured is a no-op; switching to a
    /// different path requires a `reset()` first.
    pub fn set_file_name(&mut self, path: impl Into<PathBuf>) -> Result<&Path, ConfigError> {
        let requested = path.into();
        if let Some(current) = &self.path {
            if *current != requested {
                return Err(ConfigError::FileNameConflict {
                    current: current.clone(),
                    requested
                });
            }
        }
        Ok(self.path.insert(requested).as_path())
    }

    pub fn file_name(&self) -> Result<&Path, ConfigError> {
        self.path
            .as_deref()
            .ok_or(ConfigError::FileNameNotInitialized)
    }

    /// Forget the path and the cached document.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// The cached document as last loaded or written.
    pub fn document(&self) -> &Mapping {
        &self.cache
    }

    /// Load the YAML tree into the cache.
    ///
    /// Creates the file when it does not exist. Does nothing once the cache
    /// is populated.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        if self.populated {
            debug!("YAML cache already populated");
            return Ok(());
        }
        let path = self.file_name()?.to_path_buf();
        debug!("Loading YAML file {:?}", path);
        self.cache = file_loader::load_mapping(&path)?;
        self.populated = true;
        info!("Loaded yaml tree from {:?}", path);
        Ok(())
    }

    /// Write the whole cached tree back to the file.
    pub fn write(&self) -> Result<(), ConfigError> {
        let path = self.file_name()?;
        file_loader::touch(path)?;
        file_loader::write_mapping(path, &self.cache)
    }

    /// Fetch a stanza, optionally replacing it first.
    ///
    /// A missing or null stanza is filled with its schema default and the
    /// file is rewritten. The stored value is then checked against the
    /// stanza's expected type.
    ///
    /// ## Error Handling
    /// Returns `ConfigError` for:
    /// - `name` not in the schema table
    /// - Stored value of the wrong type
    /// - File load or write failures
    pub fn stanza(&mut self, name: &str, new_value: Option<Value>) -> Result<Value, ConfigError> {
        self.load()?;
        let spec = schema::lookup(name).ok_or_else(|| ConfigError::StanzaNotPermitted {
            stanza: name.to_string()
        })?;

        if let Some(value) = new_value {
            self.cache.insert(Value::from(name), value);
            self.write()?;
        }

        if self.cache.get(name).is_none_or(Value::is_null) {
            debug!("Applying default to stanza {:?}", name);
            self.cache.insert(Value::from(name), spec.default_value());
            self.write()?;
        }

        let value = self.cache.get(name).cloned().unwrap_or(Value::Null);
        if !spec.kind.matches(&value) {
            return Err(ConfigError::MalformedStanza {
                stanza: name.to_string(),
                expected: spec.kind.to_string(),
                found: schema::type_name(&value).to_string()
            });
        }
        Ok(value)
    }

    pub fn get_stanza(&mut self, name: &str) -> Result<Value, ConfigError> {
        self.stanza(name, None)
    }

    pub fn set_stanza(&mut self, name: &str, value: Value) -> Result<Value, ConfigError> {
        self.stanza(name, Some(value))
    }

    /// `region_str` of the region stanza, if it is set to a string.
    pub fn region_str(&mut self) -> Result<Option<String>, ConfigError> {
        let region = self.get_stanza(REGION)?;
        Ok(region
            .get("region_str")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CLUSTERS, DELEGATES, KEYNAME, NAMETAG, STANZAS, TYPES};
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aws.yaml");
        (dir, path)
    }

    #[test]
    fn test_file_name_not_initialized() {
        let mut store = YamlStore::default();
        assert!(matches!(
            store.file_name(),
            Err(ConfigError::FileNameNotInitialized)
        ));
        assert!(matches!(
            store.load(),
            Err(ConfigError::FileNameNotInitialized)
        ));
    }

    #[test]
    fn test_set_file_name_once() {
        let mut store = YamlStore::default();
        store.set_file_name("a.yaml").unwrap();
        store.set_file_name("a.yaml").unwrap();
        assert!(matches!(
            store.set_file_name("b.yaml"),
            Err(ConfigError::FileNameConflict { .. })
        ));

        store.reset();
        assert_eq!(store.set_file_name("b.yaml").unwrap(), Path::new("b.yaml"));
    }

    #[test]
    #[serial]
    fn test_defaults_on_empty_file() {
        let (_dir, path) = scratch();
        fs::write(&path, "").unwrap();
        let mut store = YamlStore::new(&path);

        for spec in STANZAS {
            let value = store.get_stanza(spec.name).unwrap();
            assert_eq!(value, spec.default_value(), "stanza {}", spec.name);
        }
    }

    #[test]
    fn test_defaults_are_persisted() {
        let (_dir, path) = scratch();
        let mut store = YamlStore::new(&path);
        store.get_stanza(NAMETAG).unwrap();

        let on_disk = file_loader::load_mapping(&path).unwrap();
        assert_eq!(on_disk.get(NAMETAG), Some(&Value::from("handson")));
    }

    #[test]
    fn test_null_stanza_gets_default() {
        let (_dir, path) = scratch();
        fs::write(&path, "delegates: ~\n").unwrap();
        let mut store = YamlStore::new(&path);

        assert_eq!(store.get_stanza(DELEGATES).unwrap(), Value::from(1));
    }

    #[test]
    fn test_malformed_stanza() {
        let (_dir, path) = scratch();
        fs::write(&path, "delegates: many\ntypes: {a: b}\n").unwrap();
        let mut store = YamlStore::new(&path);

        let err = store.get_stanza(DELEGATES).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MalformedStanza { ref stanza, ref expected, .. }
                if stanza == DELEGATES && expected == "integer"
        ));
        assert!(matches!(
            store.get_stanza(TYPES),
            Err(ConfigError::MalformedStanza { .. })
        ));
    }

    #[test]
    fn test_write_then_reload() {
        let (_dir, path) = scratch();
        let mut store = YamlStore::new(&path);
        store.set_stanza(NAMETAG, Value::from("ceph-test")).unwrap();

        let mut fresh = YamlStore::new(&path);
        assert_eq!(fresh.get_stanza(NAMETAG).unwrap(), Value::from("ceph-test"));
    }

    #[test]
    fn test_write_unknown_stanza_fails() {
        let (_dir, path) = scratch();
        let mut store = YamlStore::new(&path);

        let result = store.set_stanza("bogus", Value::from(1));
        assert!(matches!(
            result,
            Err(ConfigError::StanzaNotPermitted { ref stanza }) if stanza == "bogus"
        ));
        assert!(store.document().get("bogus").is_none());
    }

    #[test]
    fn test_read_unknown_stanza_fails() {
        let (_dir, path) = scratch();
        fs::write(&path, "bogus: 1\n").unwrap();
        let mut store = YamlStore::new(&path);

        assert!(matches!(
            store.get_stanza("bogus"),
            Err(ConfigError::StanzaNotPermitted { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_survive_writes() {
        let (_dir, path) = scratch();
        fs::write(&path, "extra: keep-me\n").unwrap();
        let mut store = YamlStore::new(&path);
        store.get_stanza(CLUSTERS).unwrap();

        let on_disk = file_loader::load_mapping(&path).unwrap();
        assert_eq!(on_disk.get("extra"), Some(&Value::from("keep-me")));
    }

    #[test]
    fn test_load_is_idempotent() {
        let (_dir, path) = scratch();
        fs::write(&path, "nametag: first\n").unwrap();
        let mut store = YamlStore::new(&path);
        store.load().unwrap();
        assert!(store.is_populated());

        fs::write(&path, "nametag: second\n").unwrap();
        store.load().unwrap();
        assert_eq!(store.get_stanza(NAMETAG).unwrap(), Value::from("first"));
    }

    #[test]
    fn test_load_rejects_non_mapping() {
        let (_dir, path) = scratch();
        fs::write(&path, "just a string\n").unwrap();
        let mut store = YamlStore::new(&path);

        assert!(matches!(store.load(), Err(ConfigError::NotAMapping { .. })));
        assert!(!store.is_populated());
    }

    #[test]
    #[serial]
    fn test_keyname_default_is_logged_user() {
        let (_dir, path) = scratch();
        let mut store = YamlStore::new(&path);

        assert_eq!(
            store.get_stanza(KEYNAME).unwrap(),
            Value::String(crate::user::logged_user())
        );
    }

    #[test]
    fn test_region_str() {
        let (_dir, path) = scratch();
        let mut store = YamlStore::new(&path);
        assert_eq!(store.region_str().unwrap().as_deref(), Some("eu-west-1"));

        fs::write(&path, "region:\n  region_str: ~\n").unwrap();
        let mut store = YamlStore::new(&path);
        assert_eq!(store.region_str().unwrap(), None);
    }

    #[test]
    fn test_independent_stores() {
        let (_dir_a, path_a) = scratch();
        let (_dir_b, path_b) = scratch();
        let mut a = YamlStore::new(&path_a);
        let mut b = YamlStore::new(&path_b);

        a.set_stanza(NAMETAG, Value::from("alpha")).unwrap();
        assert_eq!(b.get_stanza(NAMETAG).unwrap(), Value::from("handson"));
        assert_eq!(a.get_stanza(NAMETAG).unwrap(), Value::from("alpha"));
    }
}
