//! Error types for uritrace-core

use thiserror::Error;

/// Main error type for the uritrace-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A symptom label that matches neither the current vocabulary nor any
    /// legacy mapping. Surfaced as a data error, never coerced to a default.
    #[error("unknown symptom label: {label}")]
    UnknownSymptom { label: String },

    /// A wire record is missing a field the domain model requires
    #[error("session record {id} is missing required field: {field}")]
    MissingField { id: String, field: &'static str },

    /// Repository/storage error reported by a collaborator
    #[error("store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for uritrace-core
pub type Result<T> = std::result::Result<T, Error>;
