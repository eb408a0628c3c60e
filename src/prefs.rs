//! Preference persistence for handler and navigator tunables.
//!
//! Navigators and handler factories read and write typed key/value pairs
//! through [`PreferencesStore`]; the store itself is a boundary concern.
//! [`MemoryStore`] backs tests and transient sessions, [`JsonFileStore`]
//! persists to a JSON document under the user configuration directory.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the file-backed preference store.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode/encode error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No configuration directory could be determined for this platform
    #[error("no configuration directory available")]
    NoConfigDir,
}

/// A typed preference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

/// Typed get/set access to preference storage, keyed by string name.
pub trait PreferencesStore {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&mut self, key: &str, value: bool);

    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64);

    fn get_double(&self, key: &str) -> Option<f64>;
    fn set_double(&mut self, key: &str, value: f64);

    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: &str);
}

fn value_as_bool(value: &PrefValue) -> Option<bool> {
    match value {
        PrefValue::Bool(b) => Some(*b),
        _ => None,
    }
}

fn value_as_int(value: &PrefValue) -> Option<i64> {
    match value {
        PrefValue::Int(i) => Some(*i),
        _ => None,
    }
}

fn value_as_double(value: &PrefValue) -> Option<f64> {
    match value {
        PrefValue::Double(d) => Some(*d),
        // A whole-number double round-trips through JSON as an integer.
        PrefValue::Int(i) => Some(*i as f64),
        _ => None,
    }
}

fn value_as_string(value: &PrefValue) -> Option<String> {
    match value {
        PrefValue::Text(s) => Some(s.clone()),
        _ => None,
    }
}

/// An in-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, PrefValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferencesStore for MemoryStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(value_as_bool)
    }
    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), PrefValue::Bool(value));
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(value_as_int)
    }
    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_owned(), PrefValue::Int(value));
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(value_as_double)
    }
    fn set_double(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), PrefValue::Double(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(value_as_string)
    }
    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_owned(), PrefValue::Text(value.to_owned()));
    }
}

/// A preference store persisted as a sorted JSON object.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    /// Writes the store back to its file, creating parent directories.
    pub fn save(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        tracing::debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferencesStore for JsonFileStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(value_as_bool)
    }
    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), PrefValue::Bool(value));
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(value_as_int)
    }
    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_owned(), PrefValue::Int(value));
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(value_as_double)
    }
    fn set_double(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), PrefValue::Double(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(value_as_string)
    }
    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_owned(), PrefValue::Text(value.to_owned()));
    }
}

/// Default preference file location under the user configuration directory.
pub fn default_path() -> Result<PathBuf, PrefsError> {
    dirs::config_dir()
        .map(|dir| dir.join("panview").join("preferences.json"))
        .ok_or(PrefsError::NoConfigDir)
}

/// Opens the store at the default location.
pub fn load_default() -> anyhow::Result<JsonFileStore> {
    let path = default_path()?;
    JsonFileStore::open(&path)
        .with_context(|| format!("loading preferences from {}", path.display()))
}
