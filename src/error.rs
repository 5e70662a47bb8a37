//! Error types for analysis operations.
//!
//! Query construction/execution failures are deliberately absent here: a
//! pattern that fails against a grammar degrades to an empty capture set
//! inside the engine and never reaches callers as an error.

use thiserror::Error;

/// Errors surfaced by file analysis and project aggregation.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The requested path does not exist on disk.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The file extension is not in the language registry.
    #[error("Unsupported language for: {0}")]
    UnsupportedLanguage(String),

    /// The parser could not be configured or produced no tree.
    #[error("Failed to parse: {0}")]
    Parse(String),

    /// A glob path specification did not form a valid pattern.
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
