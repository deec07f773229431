use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_OUTPUT_FILE;
use crate::error::{CleanerError, Result};

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cleaner.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub score: ScoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where a full clean writes its result
    pub path: PathBuf,
    /// When set, every stage also writes its output table here for debugging
    pub intermediate_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            intermediate_dir: None,
        }
    }
}

/// Weights and scales for the quality score
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub salary_weight: f64,
    pub rating_weight: f64,
    /// Highest possible company rating
    pub rating_scale: f64,
    /// Upper bound of the final score range
    pub scale_max: f64,
    /// Decimal places kept in the final score
    pub precision: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            salary_weight: 0.7,
            rating_weight: 0.3,
            rating_scale: 5.0,
            scale_max: 10.0,
            precision: 2,
        }
    }
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.salary_weight < 0.0 || self.rating_weight < 0.0 {
            return Err(CleanerError::Config(
                "score weights must not be negative".to_string(),
            ));
        }
        if self.rating_scale <= 0.0 {
            return Err(CleanerError::Config(
                "score.rating_scale must be positive".to_string(),
            ));
        }
        if self.scale_max <= 0.0 {
            return Err(CleanerError::Config(
                "score.scale_max must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub file_name: String,
    /// Filter used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_name: "cleaner.log".to_string(),
            default_filter: "listing_cleaner=info".to_string(),
        }
    }
}

impl Config {
    /// Load an explicit config file
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.score.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise `cleaner.toml` when present, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
