//! Persistent user settings.
//!
//! Settings live in `settings.json` under the platform config directory.  A
//! missing file means every setting has its default.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use th_core::errors::{Error, Result};

use crate::cli::OutputFormat;

/// Directory name used under the platform config root.
pub const APP_NAME: &str = "taiwan-holiday-cli";

/// File name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Every recognised key.
pub const KEYS: [&str; 1] = ["format"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    format: OutputFormat,
}

/// Settings backed by a JSON file.
///
/// Without a path (no resolvable config directory) the store still answers
/// reads with defaults but refuses writes.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsStore {
    /// `settings.json` in the platform config directory, if one exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Open the store at the default location.
    pub fn open_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::open(path),
            None => Ok(Self::detached()),
        }
    }

    /// Open the store at `path`.
    ///
    /// # Errors
    ///
    /// `Config` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("cannot read {}: {e}", path.display()))
            })?;
            serde_json::from_str(&text).map_err(|e| {
                Error::Config(format!("cannot parse {}: {e}", path.display()))
            })?
        } else {
            Settings::default()
        };
        Ok(Self {
            path: Some(path),
            settings,
        })
    }

    /// A store with defaults and no backing file.
    pub fn detached() -> Self {
        Self {
            path: None,
            settings: Settings::default(),
        }
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Output format used when `--format` is not given.
    pub fn default_format(&self) -> OutputFormat {
        self.settings.format
    }

    /// Every setting with its current value.
    pub fn list(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([("format", self.settings.format.name().to_string())])
    }

    /// The value of `key`.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "format" => Ok(self.settings.format.name().to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Validate and store `value` under `key`, then write the file.
    ///
    /// Nothing changes in memory if the write fails.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.settings.clone();
        match key {
            "format" => {
                let format = OutputFormat::from_name(value).ok_or_else(|| {
                    Error::Config(format!(
                        "invalid value '{value}' for format, expected one of: {}",
                        OutputFormat::NAMES.join(", ")
                    ))
                })?;
                next.format = format;
            }
            _ => return Err(unknown_key(key)),
        }
        self.save(&next)?;
        self.settings = next;
        Ok(())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let Some(path) = &self.path else {
            return Err(Error::Config(
                "no config directory available to store settings".into(),
            ));
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::Config(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, text)
            .map_err(|e| Error::Config(format!("cannot write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "unknown setting '{key}', expected one of: {}",
        KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_store_reads_defaults_and_refuses_writes() {
        let mut store = SettingsStore::detached();
        assert_eq!(store.default_format(), OutputFormat::Simple);
        assert_eq!(store.get("format").unwrap(), "simple");
        let err = store.set("format", "json").unwrap_err();
        assert_eq!(err.kind(), th_core::ErrorKind::Config);
        assert_eq!(store.default_format(), OutputFormat::Simple);
    }
}
