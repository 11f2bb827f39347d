//! Error types for roledeck

use std::fmt;

/// The main error type for roledeck operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Import text is not JSON, or not one of the accepted shapes
    MalformedImport(String),
    /// The storage backend failed (quota, disabled, I/O)
    PersistenceUnavailable(String),
    /// The OS entropy source could not produce an id
    IdGeneration(String),
    /// Reading or writing an export file failed
    Io(String),
    /// Editor configuration could not be parsed
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedImport(m) => write!(f, "malformed import: {}", m),
            Error::PersistenceUnavailable(m) => write!(f, "persistence unavailable: {}", m),
            Error::IdGeneration(m) => write!(f, "id generation failed: {}", m),
            Error::Io(m) => write!(f, "io error: {}", m),
            Error::Config(m) => write!(f, "invalid config: {}", m),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// Result type alias for roledeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Convert any backend error to `PersistenceUnavailable`
pub fn err<E: std::error::Error>(e: E) -> Error {
    Error::PersistenceUnavailable(e.to_string())
}

/// Shorthand for a `MalformedImport` error
pub(crate) fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedImport(msg.into())
}
