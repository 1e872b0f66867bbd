//! Error types for Doctrine Core
//!
//! Shape violations are the only failure the lock itself can raise. They are
//! reported synchronously and never coerced into a default verdict.
//! Configuration and I/O failures only appear when loading or saving settings.

use thiserror::Error;

/// Result type alias for Doctrine operations
pub type Result<T> = std::result::Result<T, DoctrineError>;

/// Main error type for Doctrine operations
#[derive(Error, Debug)]
pub enum DoctrineError {
    /// Vector shape errors
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Configuration values out of their admissible range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML rendering errors
    #[error("TOML render error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        /// What was being attempted
        context: String,
        /// Underlying error
        source: Box<DoctrineError>,
    },
}

/// Errors raised when a vector does not have the expected shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A vector does not have the dimension of its reference
    #[error("{context}: expected dimension {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Input could not be read as a flat list of finite numbers
    #[error("not a flat numeric vector: {0}")]
    NotNumeric(String),
}

impl ShapeError {
    /// Fail unless `actual == expected`
    pub fn check(context: &'static str, expected: usize, actual: usize) -> std::result::Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::DimensionMismatch {
                context,
                expected,
                actual,
            })
        }
    }
}

impl DoctrineError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DoctrineError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().context(f()))
    }
}
