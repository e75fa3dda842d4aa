//! Error types for pipeline-color

use thiserror::Error;

/// Errors raised while validating input or loading a palette table
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color '{0}' (expected one of: blue, cyan, green, magenta, red, yellow)")]
    InvalidColor(String),

    #[error("text to colorize must not be empty")]
    EmptyText,

    #[error("invalid palette table: {0}")]
    InvalidTable(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("palette table: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("palette table: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
