//! Configuration for the explorer.
//!
//! The city to file mapping lives here and is handed to the loader
//! explicitly; nothing reads it from global state.

use crate::error::{ExplorerError, Result};
use crate::types::City;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default directory holding the city CSV files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable overriding [`DEFAULT_DATA_DIR`].
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

fn default_sources() -> BTreeMap<City, String> {
    City::ALL
        .into_iter()
        .map(|city| (city, city.default_file_name().to_string()))
        .collect()
}

/// Configuration for a bikeshare session.
///
/// Use [`ExplorerConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use bikeshare_explorer::ExplorerConfig;
///
/// let config = ExplorerConfig::builder()
///     .data_dir("/srv/bikeshare")
///     .preview_rows(10)
///     .max_prompt_attempts(3)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Directory the source files are resolved against.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// File name of each city's trip data, relative to `data_dir`.
    /// Default: chicago.csv, new_york_city.csv, washington.csv
    pub sources: BTreeMap<City, String>,

    /// Rows shown per page when previewing raw data.
    /// Default: 5
    pub preview_rows: usize,

    /// Whether to offer the raw-row preview after loading.
    /// Default: true
    pub show_preview: bool,

    /// Invalid answers tolerated per prompt before giving up.
    /// `None` re-prompts until valid input or end of input.
    /// Default: None
    pub max_prompt_attempts: Option<usize>,

    /// Whether each report section prints how long it took.
    /// Default: true
    pub show_timings: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sources: default_sources(),
            preview_rows: 5,
            show_preview: true,
            max_prompt_attempts: None,
            show_timings: true,
        }
    }
}

impl ExplorerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::Io(e).with_context(format!("Reading config {}", path.display()))
        })?;
        let config: ExplorerConfig = serde_json::from_str(&raw)?;
        config
            .validate()
            .map_err(|e| ExplorerError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Path of the source file for a city.
    pub fn source_path(&self, city: City) -> PathBuf {
        let file = self
            .sources
            .get(&city)
            .map(String::as_str)
            .unwrap_or_else(|| city.default_file_name());
        self.data_dir.join(file)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::InvalidPreviewRows(self.preview_rows));
        }

        if self.max_prompt_attempts == Some(0) {
            return Err(ConfigValidationError::InvalidMaxAttempts(0));
        }

        if let Some((city, _)) = self.sources.iter().find(|(_, file)| file.trim().is_empty()) {
            return Err(ConfigValidationError::EmptySource(city.to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid preview rows: {0} (must be at least 1)")]
    InvalidPreviewRows(usize),

    #[error("Invalid max prompt attempts: {0} (must be at least 1)")]
    InvalidMaxAttempts(usize),

    #[error("Empty source file name for {0}")]
    EmptySource(String),
}

/// Builder for [`ExplorerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ExplorerConfigBuilder {
    data_dir: Option<PathBuf>,
    sources: BTreeMap<City, String>,
    preview_rows: Option<usize>,
    show_preview: Option<bool>,
    max_prompt_attempts: Option<usize>,
    show_timings: Option<bool>,
}

impl ExplorerConfigBuilder {
    /// Set the directory holding the city files.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Override the file name used for one city.
    pub fn source(mut self, city: City, file: impl Into<String>) -> Self {
        self.sources.insert(city, file.into());
        self
    }

    /// Set how many raw rows each preview page shows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Enable or disable the raw-row preview.
    pub fn show_preview(mut self, show: bool) -> Self {
        self.show_preview = Some(show);
        self
    }

    /// Give up on a prompt after this many invalid answers.
    pub fn max_prompt_attempts(mut self, attempts: usize) -> Self {
        self.max_prompt_attempts = Some(attempts);
        self
    }

    /// Enable or disable per-section timing lines.
    pub fn show_timings(mut self, show: bool) -> Self {
        self.show_timings = Some(show);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ExplorerConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<ExplorerConfig, ConfigValidationError> {
        let mut sources = default_sources();
        sources.extend(self.sources);

        let config = ExplorerConfig {
            data_dir: self
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            sources,
            preview_rows: self.preview_rows.unwrap_or(5),
            show_preview: self.show_preview.unwrap_or(true),
            max_prompt_attempts: self.max_prompt_attempts,
            show_timings: self.show_timings.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
