//! Error types for the daily projection engine

use thiserror::Error;


pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid row: {0}")]
    Validation(#[from] ValidationError),

    #[error("Upload contained no valid rows ({rejected} rejected)")]
    NoValidRows { rejected: usize },

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid date: {input}")]
    InvalidDate { input: String },

    #[error("Blend weights must sum to 1.0 (etr={etr}, cal={cal})")]
    InvalidBlendWeights { etr: f64, cal: f64 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid stat: {stat}")]
    InvalidStat { stat: String },
}

/// Reasons a single incoming row is dropped. Never fatal for a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: player name is empty")]
    EmptyPlayer { row: usize },

    #[error("row {row}: minutes must be a positive number, got {minutes}")]
    InvalidMinutes { row: usize, minutes: f64 },
}

impl ValidationError {
    /// Zero-based index of the offending row within its batch.
    pub fn row(&self) -> usize {
        match self {
            ValidationError::MissingField { row, .. }
            | ValidationError::EmptyPlayer { row }
            | ValidationError::InvalidMinutes { row, .. } => *row,
        }
    }
}
