//! Error types for the solace_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for solace_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// An exercise was handed to the player with no steps
    #[error("Exercise '{0}' has no steps")]
    EmptyExercise(String),

    /// An exercise step cannot be timed (zero duration)
    #[error("Exercise '{exercise}' step {index} has zero duration")]
    InvalidStep { exercise: String, index: u32 },

    /// No exercise with this id in the catalog
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// A cue sink failed to deliver a cue
    #[error("Cue delivery failed: {0}")]
    Cue(String),
}
