//! Types for working with errors produced by the backend.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::io;
use std::result::Result as StdResult;

use crate::driver::DriverError;

/// A specialized `Result` type for the backend.
pub type Result<T, E = Error> = StdResult<T, E>;

// Convenience type alias for boxed configuration and template failures.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// Represents all the ways a method can fail within the backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The settings record is incomplete or could not be parsed.
    #[error("error with configuration: {0}")]
    Configuration(#[source] BoxDynError),

    /// Error returned from the database, normalized into the host's generic category.
    #[error("error returned from database: {0}")]
    Database(Box<dyn DatabaseError>),

    /// Error raised by the driver and passed through unmodified.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Error communicating with the database or writing copy output.
    #[error("error communicating with database: {0}")]
    Io(#[from] io::Error),

    /// A `%(name)s` placeholder had no matching parameter.
    #[error("missing template parameter `{0}`")]
    Template(String),

    /// A synchronous-only extension point was invoked from an async context.
    #[error("`{0}` cannot be called from an async context; call it from a thread that is not driving an async runtime")]
    SynchronousOnly(&'static str),

    /// The operation needs an open connection but the wrapper has none.
    #[error("connection already closed")]
    ConnectionClosed,
}

impl Error {
    pub fn into_database_error(self) -> Option<Box<dyn DatabaseError + 'static>> {
        match self {
            Error::Database(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_database_error(&self) -> Option<&(dyn DatabaseError + 'static)> {
        match self {
            Error::Database(err) => Some(&**err),
            _ => None,
        }
    }

    /// Returns `true` for configuration failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    #[inline]
    pub(crate) fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }
}

/// The kind of constraint or failure reported by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    NotNullViolation,
    CheckViolation,
    Authentication,
    Other,
}

/// An error that was returned from the database.
pub trait DatabaseError: 'static + Send + Sync + StdError {
    /// The primary, human-readable error message.
    fn message(&self) -> &str;

    /// The (SQLSTATE or vendor) code for the error.
    fn code(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }

    #[doc(hidden)]
    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static);

    #[doc(hidden)]
    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static>;
}

impl dyn DatabaseError {
    /// Downcast a reference to this generic database error to a specific
    /// database error type.
    ///
    /// # Panics
    ///
    /// Panics if the database error type is not `E`.
    #[inline]
    pub fn downcast_ref<E: DatabaseError>(&self) -> &E {
        self.try_downcast_ref().unwrap_or_else(|| {
            panic!("downcast to wrong DatabaseError type; original error: {self}")
        })
    }

    /// Downcast a reference to this generic database error to a specific
    /// database error type.
    #[inline]
    pub fn try_downcast_ref<E: DatabaseError>(&self) -> Option<&E> {
        self.as_error().downcast_ref()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::config(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_exposes_wrapped_database_errors() {
        let err = Error::Database(Box::new(DriverError::new("duplicate key").with_code("100072")));

        assert_eq!(err.to_string(), "error returned from database: 100072: duplicate key");

        let database_error = err.as_database_error().unwrap();
        assert_eq!(database_error.kind(), ErrorKind::UniqueViolation);
        assert_eq!(
            database_error.downcast_ref::<DriverError>().message(),
            "duplicate key"
        );
    }
}
