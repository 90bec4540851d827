//! Centralized error handling for patchnova

use std::io;
use thiserror::Error;

/// Custom error type for patchnova operations
#[derive(Debug, Error)]
pub enum PatchnovaError {
    /// I/O errors (file reading, log writing, stdin)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Parsing errors (invalid tool output)
    #[error("Parse error: {0}")]
    Parse(String),
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
    /// System detection errors (missing tools, unreadable host data)
    #[error("Detection error: {0}")]
    Detection(String),
    /// The operation has no implementation for this operating system
    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),
    /// An external command ran but did not exit successfully
    #[error("Command '{command}' failed with exit code: {code:?}")]
    CommandFailed { command: String, code: Option<i32> },
    /// An external command could not be started
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config file: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("Could not serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Type alias for Results in patchnova
pub type Result<T> = std::result::Result<T, PatchnovaError>;
