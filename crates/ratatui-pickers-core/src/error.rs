use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Errors reported by configuration entry points (format strings, locales).
///
/// Parsing typed dates never produces one of these: invalid input is `None`, and out-of-bounds
/// dates are silently ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("unknown date format '{0}'")]
    UnknownDateFormat(String),

    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
}

pub type Result<T> = std::result::Result<T, PickerError>;

/// Failure returned by a [`crate::tree::ChildLoader`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct LoadError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error, keeping it reachable through [`std::error::Error::source`].
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LoadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Renders a load error and its source chain on one line, `outer: inner: ...`.
pub fn error_chain(err: &LoadError) -> String {
    struct Chain<'a>(&'a LoadError);

    impl fmt::Display for Chain<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)?;
            let mut cur = self.0.source();
            while let Some(err) = cur {
                write!(f, ": {err}")?;
                cur = err.source();
            }
            Ok(())
        }
    }

    Chain(err).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn picker_error_display() {
        let err = PickerError::UnknownDateFormat("DD.MM.YYYY".to_string());
        assert_eq!(err.to_string(), "unknown date format 'DD.MM.YYYY'");
    }

    #[test]
    fn load_error_keeps_source_chain() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "backend timed out");
        let err = LoadError::with_source("failed to load children", io_err);
        assert!(err.source().is_some());
        assert_eq!(
            error_chain(&err),
            "failed to load children: backend timed out"
        );
    }
}
