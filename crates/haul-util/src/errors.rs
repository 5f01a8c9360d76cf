use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for haul operations outside the publish pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum HaulError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (`Haul.toml`).
    #[error("Manifest error: {message}")]
    #[diagnostic(code(haul::manifest), help("Check your Haul.toml for syntax errors"))]
    Manifest { message: String },

    /// Building the HTTP client or addressing the store failed.
    #[error("Network error: {message}")]
    #[diagnostic(code(haul::network))]
    Network { message: String },
}
