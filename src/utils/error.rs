//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while decoding or applying a source map
#[derive(Error, Debug)]
pub enum SourceMapError {
    #[error("Source map JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid source map: {0}")]
    InvalidSourceMap(String),
}

/// Failure reported by a DOM session collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SessionError(pub String);

impl SessionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while resolving trace nodes to page elements
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("No trace was captured for this page load")]
    MissingTraceData,

    #[error("DOM session {operation} failed: {source}")]
    Session {
        operation: &'static str,
        #[source]
        source: SessionError,
    },
}

impl ResolutionError {
    pub(crate) fn session(operation: &'static str) -> impl FnOnce(SessionError) -> Self {
        move |source| ResolutionError::Session { operation, source }
    }
}

/// Errors that can occur while loading analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
