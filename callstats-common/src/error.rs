//! Common error types for callstats

use thiserror::Error;

/// Common result type for callstats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the callstats crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error while preparing folders or moving report files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config file exists but does not parse
    #[error("Config file parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration resolution or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input (bad period, bad filename)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code, used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::Database(_) => "DATABASE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::ConfigParse(_) | Error::Config(_) => "CONFIG_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
