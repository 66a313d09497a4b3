//! Settings file handling.
//!
//! Settings come from a TOML file with one table per stage:
//!
//! ```toml
//! [extract]
//! delimiter = ";"
//!
//! [transform]
//! remove_outliers = false
//!
//! [load]
//! batch_size = 500
//!
//! [store]
//! path = "/var/lib/tabula/catalog.tbl"
//!
//! [retention]
//! days = 90
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tabula_ingest::{DEFAULT_MAX_FILE_SIZE, ExtractOptions};
use tabula_load::LoadOptions;
use tabula_transform::TransformOptions;

/// Default retention window for `cleanup`.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

const SETTINGS_FILE: &str = "settings.toml";
const STORE_FILE: &str = "catalog.tbl";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "tabula", "tabula")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extract: ExtractSettings,
    pub transform: TransformOptions,
    pub load: LoadOptions,
    pub store: StoreSettings,
    pub retention: RetentionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Single ASCII character; probed when unset.
    pub delimiter: Option<char>,
    pub max_file_size: u64,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store file; the platform data directory when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    pub days: u32,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl Settings {
    /// Resolves settings from an explicit path or the platform config dir.
    ///
    /// An explicit file must exist and parse. The default-location file is
    /// optional, and a malformed one is reported and ignored.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path)?
                .with_context(|| format!("settings file {} not found", path.display()));
        }
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };
        match Self::load_from(&path) {
            Ok(settings) => Ok(settings.unwrap_or_default()),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "Ignoring malformed settings file"
                );
                Ok(Self::default())
            }
        }
    }

    /// Loads a settings file; `None` when it does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error).with_context(|| format!("read {}", path.display()));
            }
        };
        let settings: Self =
            toml::from_str(&content).with_context(|| format!("parse {}", path.display()))?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(Some(settings))
    }

    /// `settings.toml` in the platform config directory.
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// The configured store path, else the platform data directory, else the
    /// working directory.
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join(STORE_FILE))
                .unwrap_or_else(|| PathBuf::from(STORE_FILE))
        })
    }

    pub fn extract_options(&self) -> Result<ExtractOptions> {
        let delimiter = self.extract.delimiter.map(delimiter_byte).transpose()?;
        Ok(ExtractOptions {
            delimiter,
            max_file_size: self.extract.max_file_size,
            max_rows: None,
        })
    }

    fn validate(&self) -> Result<()> {
        if let Some(delimiter) = self.extract.delimiter {
            delimiter_byte(delimiter)?;
        }
        if !(0.0..=1.0).contains(&self.load.success_threshold) {
            bail!(
                "load.success_threshold must be between 0 and 1, got {}",
                self.load.success_threshold
            );
        }
        if self.transform.iqr_multiplier <= 0.0 {
            bail!(
                "transform.iqr_multiplier must be positive, got {}",
                self.transform.iqr_multiplier
            );
        }
        Ok(())
    }
}

/// Converts a delimiter character to the byte the extractor expects.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && !delimiter.is_ascii_alphanumeric() && delimiter != '"' {
        Ok(delimiter as u8)
    } else {
        bail!("unsupported delimiter {delimiter:?}")
    }
}
