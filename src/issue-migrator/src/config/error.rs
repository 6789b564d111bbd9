//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading the migration configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse configuration '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the configuration.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// A token references an environment variable that is not set.
    #[error("Environment variable '{variable}' for actor '{actor}' is not set")]
    MissingEnv { actor: String, variable: String },

    /// The configured tokens do not form a usable credential pool.
    #[error(transparent)]
    Credentials(#[from] crate::credentials::CredentialError),
}
