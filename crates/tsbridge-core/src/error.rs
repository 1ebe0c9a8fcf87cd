//! Error types and handling for configuration resolution and compilation

use crate::diagnostics::DiagnosticsReport;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tsbridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// An explicitly requested config file or project directory does not exist
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// An explicitly requested config file exists but is not valid JSON/JSONC
    #[error("Failed to parse config '{}': {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// An `extends` chain revisited an already-resolved config file
    #[error("Circular 'extends' chain detected: {chain}")]
    ConfigCycle { chain: String },

    /// File system I/O errors
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external compiler engine failed outside of its diagnostics channel
    #[error("Compiler engine error: {message}")]
    Engine { message: String },

    /// The engine reported error-severity diagnostics; carries the full report
    #[error("Compilation failed with {} error(s)", report.error.len())]
    CompilationFailed { report: Box<DiagnosticsReport> },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigNotFound,
    ConfigParse,
    ConfigCycle,
    Io,
    Engine,
    Compilation,
}

impl BridgeError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::ConfigNotFound { .. } => ErrorKind::ConfigNotFound,
            BridgeError::ConfigParse { .. } => ErrorKind::ConfigParse,
            BridgeError::ConfigCycle { .. } => ErrorKind::ConfigCycle,
            BridgeError::Io { .. } => ErrorKind::Io,
            BridgeError::Engine { .. } => ErrorKind::Engine,
            BridgeError::CompilationFailed { .. } => ErrorKind::Compilation,
        }
    }

    /// Create a config-not-found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a cycle error from the chain of visited config paths
    pub fn config_cycle(chain: impl IntoIterator<Item = PathBuf>) -> Self {
        let chain = chain
            .into_iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::ConfigCycle { chain }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an engine error
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Create a compilation-failed error carrying the triaged report
    pub fn compilation_failed(report: DiagnosticsReport) -> Self {
        Self::CompilationFailed {
            report: Box::new(report),
        }
    }
}
