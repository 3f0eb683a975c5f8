//! Error types for americas-core (WASM-compatible)

use thiserror::Error;

/// Result type alias for americas-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that work in both native and WASM environments
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown fiscal year: {0}")]
    NotFound(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Cannot compute a percentage of a zero total")]
    DivisionByZero,

    #[error("Failed to parse: {0}")]
    Parse(String),

    #[error("Census derivation failed: {0}")]
    Census(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
