//! The downstream contract: what the backend needs from a vendor driver.
//!
//! A driver binding implements [`Driver`], [`DriverConnection`] and
//! [`DriverCursor`] (plus [`CopyCursor`] when it supports bulk transfer).
//! Everything the backend sends or receives is expressed with
//! [`serde_json::Value`], the same text-first representation the Snowflake
//! SQL API returns.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::io;

use crate::error::{DatabaseError, ErrorKind};

/// A single result row.
pub type Row = Vec<serde_json::Value>;

/// A vendor driver: the thing that knows how to open connections.
pub trait Driver: Send + Sync + 'static {
    /// Keyword parameters accepted by [`connect`][Driver::connect].
    type Params;

    type Connection: DriverConnection;

    /// Open a new connection. One attempt, no retries.
    fn connect(&self, params: &Self::Params) -> Result<Self::Connection, DriverError>;
}

/// A live driver connection.
pub trait DriverConnection: Send {
    type Cursor: DriverCursor;

    /// Create a new, unnamed cursor bound to this connection.
    fn cursor(&mut self) -> Result<Self::Cursor, DriverError>;

    fn autocommit(&self) -> bool;

    fn set_autocommit(&mut self, autocommit: bool) -> Result<(), DriverError>;

    fn commit(&mut self) -> Result<(), DriverError>;

    fn rollback(&mut self) -> Result<(), DriverError>;

    fn close(&mut self) -> Result<(), DriverError>;
}

/// A driver cursor. Dropping a cursor must release it.
pub trait DriverCursor: Send {
    fn execute(&mut self, sql: &str, params: &[serde_json::Value]) -> Result<(), DriverError>;

    fn executemany(
        &mut self,
        sql: &str,
        param_list: &[Vec<serde_json::Value>],
    ) -> Result<(), DriverError> {
        for params in param_list {
            self.execute(sql, params)?;
        }

        Ok(())
    }

    fn fetchone(&mut self) -> Result<Option<Row>, DriverError>;

    fn fetchall(&mut self) -> Result<Vec<Row>, DriverError>;

    /// Rows produced or affected by the last statement, if the driver knows.
    fn rowcount(&self) -> Option<u64>;

    fn close(&mut self) -> Result<(), DriverError>;
}

/// Bulk-transfer operations offered by some driver cursors.
pub trait CopyCursor: DriverCursor {
    /// Run a `COPY ...` statement, streaming data from or to `stream`.
    fn copy_expert(
        &mut self,
        sql: &str,
        stream: CopyStream<'_>,
        size: Option<usize>,
    ) -> Result<(), DriverError>;

    /// Write the contents of `table` to `file`.
    fn copy_to(
        &mut self,
        file: &mut dyn io::Write,
        table: &str,
        options: &CopyToOptions,
    ) -> Result<(), DriverError>;
}

/// The data side of a `copy_expert` call.
pub enum CopyStream<'a> {
    /// `COPY ... FROM STDIN`
    Read(&'a mut dyn io::Read),
    /// `COPY ... TO STDOUT`
    Write(&'a mut dyn io::Write),
}

impl fmt::Debug for CopyStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStream::Read(_) => f.write_str("CopyStream::Read"),
            CopyStream::Write(_) => f.write_str("CopyStream::Write"),
        }
    }
}

/// Formatting options for [`CopyCursor::copy_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyToOptions {
    pub sep: String,
    pub null: String,
    pub columns: Option<Vec<String>>,
}

impl Default for CopyToOptions {
    fn default() -> Self {
        Self {
            sep: "\t".into(),
            null: "\\N".into(),
            columns: None,
        }
    }
}

/// An error raised by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub(crate) code: Option<String>,
    pub(crate) message: String,
    pub(crate) sql_state: Option<String>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            sql_state: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    pub fn sql_state(&self) -> Option<&str> {
        self.sql_state.as_deref()
    }
}

impl Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DriverError {}

impl DatabaseError for DriverError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        self.code.as_deref().map(Cow::Borrowed)
    }

    fn kind(&self) -> ErrorKind {
        let code = match self.code.as_deref() {
            Some(code) => code,
            None => return ErrorKind::Other,
        };

        match code {
            "100072" => ErrorKind::UniqueViolation,
            "100071" => ErrorKind::NotNullViolation,
            "100070" => ErrorKind::ForeignKeyViolation,
            "100069" => ErrorKind::CheckViolation,
            // 3901xx: login and session failures
            _ if code.len() == 6 && code.starts_with("3901") => ErrorKind::Authentication,
            _ => ErrorKind::Other,
        }
    }

    #[doc(hidden)]
    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    #[doc(hidden)]
    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }
}
