use crate::error::StoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs, io, path::PathBuf};

/// The persisted version record.
///
/// `version` is required; `majorVersion` and `minorVersion` are optional
/// and tolerate junk: a missing or non-integer value reads as `None` and is
/// defaulted (`1`/`0`) by the pipeline, which always writes the defaults
/// back. Fields this crate does not know about are captured in `extra` and
/// written back untouched, so collaborators sharing the file never lose
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// The current version string.
    pub version: String,

    /// Pass-through major number, when the record carries a usable one.
    #[serde(
        rename = "majorVersion",
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub major_version: Option<u64>,

    /// Pass-through minor number, when the record carries a usable one.
    #[serde(
        rename = "minorVersion",
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub minor_version: Option<u64>,

    /// Everything else the collaborators keep in the record.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VersionRecord {
    /// A record holding only a version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            major_version: None,
            minor_version: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Accepts an integer, and quietly turns anything else (strings, floats,
/// null) into `None` so the pipeline's defaulting applies.
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64())
}

/// The persisted format configuration. The `format` field is optional;
/// everything about this store is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    /// The configured format string, e.g. `"YYYY.MM.DD.N"`.
    #[serde(default)]
    pub format: Option<String>,
}

/// Where the version record lives. Read fully before deriving, overwritten
/// fully after; the implementations never rewrite the record mid-run.
pub trait VersionStore {
    /// Reads the whole record.
    fn get(&self) -> Result<VersionRecord, StoreError>;

    /// Writes the whole record back, including fields it merely carries.
    fn put(&mut self, record: &VersionRecord) -> Result<(), StoreError>;
}

/// Where the format configuration lives. `None` means no configuration is
/// available and the default format applies.
pub trait ConfigStore {
    /// Reads the configuration, if there is one.
    fn get(&self) -> Result<Option<VersionConfig>, StoreError>;
}

/// A [`VersionStore`] over a JSON file, conventionally `version.json`.
///
/// Written pretty-printed with a trailing newline, the way the footer
/// component and other collaborators expect to read it.
#[derive(Debug, Clone)]
pub struct JsonVersionStore {
    path: PathBuf,
}

impl JsonVersionStore {
    /// A store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// True if the store file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl VersionStore for JsonVersionStore {
    fn get(&self) -> Result<VersionRecord, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn put(&mut self, record: &VersionRecord) -> Result<(), StoreError> {
        let mut text =
            serde_json::to_string_pretty(record).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        text.push('\n');
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// A [`ConfigStore`] over a JSON file, conventionally `version-config.json`.
///
/// A missing file is simply no configuration. An unreadable or malformed
/// file is treated the same way, with a warning, because a broken config
/// should never block a commit.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// A store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// True if the store file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes `config` out, pretty-printed.
    pub fn put(&mut self, config: &VersionConfig) -> Result<(), StoreError> {
        let mut text =
            serde_json::to_string_pretty(config).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        text.push('\n');
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self) -> Result<Option<VersionConfig>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                tracing::warn!(
                    "could not read `{}` ({err}), using the default format",
                    self.path.display()
                );
                return Ok(None);
            }
        };

        match serde_json::from_str(&text) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!(
                    "`{}` is not a valid config ({err}), using the default format",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }
}
