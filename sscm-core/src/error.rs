//! Error types for the Surround SCM bridge

use thiserror::Error;

/// Result type alias for Surround SCM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Surround SCM operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required argument was empty or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The sscm client exited with a non-zero code; carries its stderr verbatim
    #[error("{0}")]
    ExternalTool(String),

    /// The sscm executable could not be launched
    #[error("sscm executable not found at '{0}'. Is the Surround SCM command line client installed?")]
    ToolNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output from the client could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Error for a required parameter that was not supplied
    pub fn missing(parameter: &str) -> Self {
        Error::InvalidArgument(format!("{} must not be empty", parameter))
    }
}
