use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

use order_bot_model::ErrorKind as ModelErrorKind;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The submitted text was empty or whitespace only.
    EmptySubmission,
    /// The product is not in the catalog.
    InvalidSelection,
    /// The product catalog is malformed.
    InvalidCatalog,
    /// The language model call failed or returned no usable reply.
    ExternalService(ModelErrorKind),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::EmptySubmission => write!(f, "Empty submission"),
            ErrorKind::InvalidSelection => write!(f, "Invalid selection"),
            ErrorKind::InvalidCatalog => write!(f, "Invalid catalog"),
            ErrorKind::ExternalService(kind) => {
                write!(f, "External service failure ({kind})")
            }
        }
    }
}

/// Describes an error from the order assistant.
///
/// None of these errors end the session. After any of them the session
/// state is consistent and the caller may simply try again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `EmptySubmission` kind.
    #[inline]
    pub fn empty_submission() -> Self {
        Self {
            kind: ErrorKind::EmptySubmission,
            reason: None,
        }
    }

    /// Creates a new error with the `InvalidSelection` kind.
    #[inline]
    pub fn invalid_selection() -> Self {
        Self {
            kind: ErrorKind::InvalidSelection,
            reason: None,
        }
    }

    /// Creates a new error with the `InvalidCatalog` kind.
    #[inline]
    pub fn invalid_catalog() -> Self {
        Self {
            kind: ErrorKind::InvalidCatalog,
            reason: None,
        }
    }

    /// Creates a new error with the `ExternalService` kind.
    #[inline]
    pub fn external_service(kind: ModelErrorKind) -> Self {
        Self {
            kind: ErrorKind::ExternalService(kind),
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {reason}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_falls_back_to_kind() {
        let err = Error::invalid_selection();
        assert_eq!(err.reason(), "Invalid selection");

        let err = err.with_reason("no such product: Tablet");
        assert_eq!(err.kind(), ErrorKind::InvalidSelection);
        assert_eq!(err.reason(), "no such product: Tablet");
        assert_eq!(
            err.to_string(),
            "Invalid selection: no such product: Tablet"
        );
    }

    #[test]
    fn test_external_service_display() {
        let err = Error::external_service(ModelErrorKind::RateLimitExceeded);
        assert_eq!(
            err.to_string(),
            "External service failure (rate limit exceeded)"
        );
    }
}
