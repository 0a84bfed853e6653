//! Error types for xml-common
//!
//! One variant per failure category: argument validation, DOM structure,
//! namespaces and names, XML syntax, resource limits, and I/O.

use std::fmt;
use thiserror::Error;

/// Result type alias using the xml-common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xml-common operations
#[derive(Error, Debug)]
pub enum Error {
    /// A precondition on an argument was violated
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A DOM element does not have the expected name or namespace
    #[error("invalid DOM element: {0}")]
    InvalidDomElement(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// XML reading or writing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl Error {
    /// Shorthand for an [`Error::InvalidArgument`]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Returns true for precondition violations
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

/// Raised when an I/O operation cannot be handled
#[derive(Debug)]
pub struct IoError {
    message: String,
    source: Option<std::io::Error>,
}

impl IoError {
    /// Message used when no message is supplied
    pub const DEFAULT_MESSAGE: &'static str = "Generic I/O Exception.";

    /// Create a new I/O error; an empty or missing message falls back to
    /// [`IoError::DEFAULT_MESSAGE`]
    pub fn new(message: Option<&str>) -> Self {
        let message = match message {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => Self::DEFAULT_MESSAGE.to_string(),
        };
        Self {
            message,
            source: None,
        }
    }

    /// Attach the underlying I/O error
    pub fn with_source(mut self, source: std::io::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// The error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for IoError {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::new(None).with_source(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.into())
    }
}
