//! Error types for koun-edge
//!
//! All modules use `EdgeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for koun-edge operations
pub type EdgeResult<T> = Result<T, EdgeError>;

/// All errors that can occur in koun-edge
#[derive(Error, Debug)]
pub enum EdgeError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Cache store errors
    #[error("Failed to open cache store at {path}: {source}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create cache partition {name}: {reason}")]
    PartitionCreate { name: String, reason: String },

    #[error("Cache partition not found: {0}")]
    PartitionNotFound(String),

    #[error("Corrupt cache entry {key}: {reason}")]
    EntryCorrupt { key: String, reason: String },

    // Network errors
    #[error("Network request failed: {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    UrlInvalid(String),

    // Worker lifecycle errors
    #[error("Invalid worker transition: {from} -> {to}")]
    Lifecycle { from: String, to: String },

    #[error("Worker is not active (phase: {0})")]
    WorkerNotActive(String),

    #[error("Failed to seed shell asset {path}: {reason}")]
    ShellSeed { path: String, reason: String },

    // Fingerprint errors
    #[error("Failed to read environment capture {path}: {reason}")]
    EnvCapture { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl EdgeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport error for a URL
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a shell seeding error
    pub fn shell_seed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShellSeed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::ShellSeed { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound(_) => Some("Run: koun-edge config init"),
            Self::WorkerNotActive(_) => Some("Run: koun-edge install"),
            Self::PartitionNotFound(_) => Some("Run: koun-edge install"),
            Self::StoreOpen { .. } => Some("Check permissions on the state directory"),
            _ => None,
        }
    }
}
