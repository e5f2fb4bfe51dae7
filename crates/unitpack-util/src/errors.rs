use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all unitpack operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PackError {
    /// Invalid or malformed resolution trace file.
    #[error("Trace error: {message}")]
    #[diagnostic(help("The trace must be the JSON document emitted by the dependency resolver"))]
    Trace { message: String },

    /// Invalid or unreadable configuration.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.unitpack/config.toml for syntax errors"))]
    Config { message: String },

    /// The resolver event stream is malformed; the graph can no longer be trusted.
    #[error("Graph consistency error: {message}")]
    #[diagnostic(help("The resolver emitted unbalanced or mismatched events"))]
    GraphConsistency { message: String },

    /// The resolver broke the listener contract.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type PackResult<T> = miette::Result<T>;
