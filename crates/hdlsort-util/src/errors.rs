use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all hdlsort operations.
///
/// Only conditions that stop a run end up here. Unresolved names, conflicts
/// and dropped units are reported through the diagnostics stream instead.
#[derive(Debug, Error, Diagnostic)]
pub enum HdlSortError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed project configuration (e.g. HdlSort.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your HdlSort.toml for syntax errors"))]
    Config { message: String },

    /// A source path could not be read.
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// A binding request string could not be parsed.
    #[error("Invalid binding request: {message}")]
    #[diagnostic(help("Expected LIBRARY.ENTITY(ARCHITECTURE), ENTITY(ARCHITECTURE) or ENTITY"))]
    Binding { message: String },

    /// Writing the ordered list or archive failed.
    #[error("Output error: {message}")]
    Output { message: String },

    /// An external command could not be spawned.
    #[error("Command failed: {message}")]
    Command { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type HdlSortResult<T> = miette::Result<T>;
