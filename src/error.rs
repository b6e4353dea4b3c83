//! Error types for the aqtion crate

use thiserror::Error;

/// Main error type for the aqtion crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("tile ({x}, {y}) is outside the level")]
    OutOfBounds { x: i32, y: i32 },

    #[error("level has {rows} rows but the configured height is {max}")]
    LevelTooTall { rows: usize, max: usize },

    #[error("invalid tile '{character}' at row {row}, column {column}")]
    InvalidTile {
        character: char,
        row: usize,
        column: usize,
    },

    #[error("level has no rows")]
    EmptyLevel,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("action index {index} is out of range")]
    InvalidAction { index: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
