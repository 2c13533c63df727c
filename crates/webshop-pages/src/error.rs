// Error types for webshop-pages
//
// Driver failures are carried verbatim so a failing step points at the real
// cause. Assertion failures carry the expectation and the observed value.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for page-object operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by page objects, the session layer and the account fixture
#[derive(Debug, Error)]
pub enum Error {
    /// Automation-layer failure (element not found, action or navigation timeout)
    #[error(transparent)]
    Driver(#[from] playwright_rs::Error),

    /// An expectation about rendered state was not met
    #[error("Assertion failed for {subject}: expected {expected}, got {actual}")]
    Assertion {
        subject: String,
        expected: String,
        actual: String,
    },

    /// A bounded wait (load state, URL change) exhausted its budget
    #[error("Timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    /// A required environment variable is unset or empty
    ///
    /// Raised at startup so forms are never filled with a placeholder value.
    #[error("Required environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// An environment variable is set but cannot be used
    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Element index that does not fit the driver's `nth=` selector
    #[error("Element index {0} is out of range")]
    IndexOutOfRange(usize),

    /// Base URL or navigation target could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A URL pattern used in an assertion is not a valid regex
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Credential file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential file contents
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Builds an assertion error from anything printable.
    pub fn assertion(
        subject: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Error::Assertion {
            subject: subject.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Fails with [`Error::Assertion`] unless `condition` holds.
pub(crate) fn ensure(
    condition: bool,
    subject: impl Into<String>,
    expected: impl std::fmt::Display,
    actual: impl std::fmt::Display,
) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::assertion(subject, expected, actual))
    }
}
