use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Failed to parse {column} value {value:?}: {reason}")]
    Parse {
        column: String,
        value: String,
        reason: String,
    },

    #[error("Stage '{stage}' requires missing column: {column}")]
    MissingColumn { stage: String, column: String },

    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CleanerError {
    pub fn parse(column: &str, value: &str, reason: impl Into<String>) -> Self {
        CleanerError::Parse {
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing_column(stage: &str, column: &str) -> Self {
        CleanerError::MissingColumn {
            stage: stage.to_string(),
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;
