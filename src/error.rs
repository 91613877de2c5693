//! Error types for matscout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for matscout operations.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScoutError {
    /// The stable kind tag reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Retrieval(_) => ErrorKind::Retrieval,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Configuration,
        }
    }
}

/// Coarse error classification surfaced at the agent boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Extraction,
    Authentication,
    Retrieval,
    Configuration,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Authentication => "authentication",
            Self::Retrieval => "retrieval",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// No chemistry could be recognized in the user's text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("query is empty")]
    EmptyQuery,

    /// Carries the query length in characters, never the text itself.
    #[error("no chemical elements or formula found in a {0}-character query")]
    NothingRecognized(usize),
}

/// Credential problems in live mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("no API key configured for live mode")]
    MissingCredential,

    #[error("API key was rejected by the materials service (HTTP {0})")]
    Rejected(u16),
}

/// Transport and service-side failures in live mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Live mode requested but no live materials provider is configured")]
    NoLiveProvider,
}

/// Result type alias for matscout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
