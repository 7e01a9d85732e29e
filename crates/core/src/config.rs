//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.toml` under the user's
//! config directory, then `HOTELRES_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::persistence::{RecordFormat, ReservationStore, DEFAULT_DATA_FILE};

/// Directory under `~/.config` holding the configuration file.
pub const CONFIG_DIR: &str = "hotelres";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# Hotel reservation console configuration.

# File used by Save and Load.
data_file = "reservations.txt"

# Line format of the data file: "comma" or "json-lines".
record_format = "comma"

# Directory receiving hotelres.log.
log_dir = "logs"

# Load data_file on start when it exists.
load_on_start = false
"#;

/// Runtime settings for the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Save/load target.
    pub data_file: PathBuf,
    /// Line format of the data file.
    pub record_format: RecordFormat,
    /// Directory receiving the log file.
    pub log_dir: PathBuf,
    /// Whether to load `data_file` at startup.
    pub load_on_start: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            record_format: RecordFormat::default(),
            log_dir: PathBuf::from("logs"),
            load_on_start: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path`; a missing file falls back to defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("data_file", defaults.data_file.to_string_lossy().to_string())?
            .set_default("record_format", defaults.record_format.to_string())?
            .set_default("log_dir", defaults.log_dir.to_string_lossy().to_string())?
            .set_default("load_on_start", defaults.load_on_start)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("HOTELRES"))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Store reading and writing the configured data file.
    pub fn store(&self) -> ReservationStore {
        ReservationStore::new(&self.data_file, self.record_format)
    }
}

/// Location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("config.toml"))?;
        assert_eq!(config.data_file, PathBuf::from("reservations.txt"));
        assert_eq!(config.record_format, RecordFormat::Comma);
        assert!(!config.load_on_start);
        Ok(())
    }

    #[test]
    fn default_template_parses_and_file_overrides_apply() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("hotelres").join("config.toml");
        write_default_config(&path)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.log_dir, PathBuf::from("logs"));

        fs::write(
            &path,
            "data_file = \"data/bookings.jsonl\"\nrecord_format = \"json-lines\"\nload_on_start = true\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.record_format, RecordFormat::JsonLines);
        assert!(config.load_on_start);
        assert_eq!(config.store().path(), Path::new("data/bookings.jsonl"));
        Ok(())
    }

    #[test]
    fn existing_config_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "load_on_start = true\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "load_on_start = true\n");
        Ok(())
    }
}
