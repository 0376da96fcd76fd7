use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use serde::Serialize;

use crate::backend::{Backend, CursorOf};
use crate::driver::{DriverCursor, Row};
use crate::error::Error;
use crate::logger::{LogSettings, QueryLog, QueryLogger};

/// A driver cursor as handed out by the host.
pub struct CursorWrapper<C> {
    cursor: C,
}

impl<C: DriverCursor> CursorWrapper<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }

    pub fn execute(&mut self, sql: &str, params: &[serde_json::Value]) -> Result<(), Error> {
        Ok(self.cursor.execute(sql, params)?)
    }

    pub fn executemany(
        &mut self,
        sql: &str,
        param_list: &[Vec<serde_json::Value>],
    ) -> Result<(), Error> {
        Ok(self.cursor.executemany(sql, param_list)?)
    }

    pub fn fetchone(&mut self) -> Result<Option<Row>, Error> {
        Ok(self.cursor.fetchone()?)
    }

    pub fn fetchall(&mut self) -> Result<Vec<Row>, Error> {
        Ok(self.cursor.fetchall()?)
    }

    pub fn rowcount(&self) -> Option<u64> {
        self.cursor.rowcount()
    }

    pub fn close(&mut self) -> Result<(), Error> {
        Ok(self.cursor.close()?)
    }

    /// The driver cursor, for operations the host does not wrap.
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.cursor
    }

    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C> Debug for CursorWrapper<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorWrapper").finish_non_exhaustive()
    }
}

/// What a debug cursor needs to record statements for its connection.
#[derive(Clone, Debug)]
pub struct DebugContext {
    pub(crate) alias: Arc<str>,
    pub(crate) settings: LogSettings,
    pub(crate) log: QueryLog,
}

impl DebugContext {
    pub fn new(alias: impl Into<Arc<str>>, settings: LogSettings, log: QueryLog) -> Self {
        Self {
            alias: alias.into(),
            settings,
            log,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Starts recording `sql`. The record is written when the returned guard drops.
    pub fn debug_sql<P>(&self, sql: &str, params: Option<&P>, many: Option<usize>) -> QueryLogger
    where
        P: Serialize + ?Sized,
    {
        let params = match params {
            Some(params) => serde_json::to_string(params).unwrap_or_default(),
            None => "None".to_owned(),
        };

        QueryLogger::new(
            sql.to_owned(),
            params,
            many,
            self.alias.clone(),
            self.settings.clone(),
            self.log.clone(),
        )
    }
}

/// A cursor that records every statement it runs in the connection's query log.
pub struct CursorDebugWrapper<C> {
    cursor: CursorWrapper<C>,
    context: DebugContext,
}

impl<C: DriverCursor> CursorDebugWrapper<C> {
    pub fn new(cursor: CursorWrapper<C>, context: DebugContext) -> Self {
        Self { cursor, context }
    }

    pub fn debug_sql<P>(&self, sql: &str, params: Option<&P>, many: Option<usize>) -> QueryLogger
    where
        P: Serialize + ?Sized,
    {
        self.context.debug_sql(sql, params, many)
    }

    pub fn execute(&mut self, sql: &str, params: &[serde_json::Value]) -> Result<(), Error> {
        let _scope = self.context.debug_sql(sql, Some(params), None);
        self.cursor.execute(sql, params)
    }

    pub fn executemany(
        &mut self,
        sql: &str,
        param_list: &[Vec<serde_json::Value>],
    ) -> Result<(), Error> {
        let _scope = self
            .context
            .debug_sql(sql, Some(param_list), Some(param_list.len()));
        self.cursor.executemany(sql, param_list)
    }

    pub fn fetchone(&mut self) -> Result<Option<Row>, Error> {
        self.cursor.fetchone()
    }

    pub fn fetchall(&mut self) -> Result<Vec<Row>, Error> {
        self.cursor.fetchall()
    }

    pub fn rowcount(&self) -> Option<u64> {
        self.cursor.rowcount()
    }

    pub fn close(&mut self) -> Result<(), Error> {
        self.cursor.close()
    }

    pub fn cursor_mut(&mut self) -> &mut CursorWrapper<C> {
        &mut self.cursor
    }

    pub fn context(&self) -> &DebugContext {
        &self.context
    }
}

impl<C> Debug for CursorDebugWrapper<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorDebugWrapper")
            .field("alias", &self.context.alias)
            .finish_non_exhaustive()
    }
}

/// A cursor returned by [`DatabaseWrapper::cursor`][crate::backend::DatabaseWrapper::cursor].
pub enum Cursor<B: Backend> {
    Plain(CursorWrapper<CursorOf<B>>),
    Debug(B::DebugCursor),
}

impl<B: Backend> Cursor<B> {
    pub fn execute(&mut self, sql: &str, params: &[serde_json::Value]) -> Result<(), Error> {
        match self {
            Cursor::Plain(cursor) => cursor.execute(sql, params),
            Cursor::Debug(cursor) => cursor.execute(sql, params),
        }
    }

    pub fn executemany(
        &mut self,
        sql: &str,
        param_list: &[Vec<serde_json::Value>],
    ) -> Result<(), Error> {
        match self {
            Cursor::Plain(cursor) => cursor.executemany(sql, param_list),
            Cursor::Debug(cursor) => cursor.executemany(sql, param_list),
        }
    }

    pub fn fetchone(&mut self) -> Result<Option<Row>, Error> {
        match self {
            Cursor::Plain(cursor) => cursor.fetchone(),
            Cursor::Debug(cursor) => cursor.fetchone(),
        }
    }

    pub fn fetchall(&mut self) -> Result<Vec<Row>, Error> {
        match self {
            Cursor::Plain(cursor) => cursor.fetchall(),
            Cursor::Debug(cursor) => cursor.fetchall(),
        }
    }

    pub fn rowcount(&self) -> Option<u64> {
        match self {
            Cursor::Plain(cursor) => cursor.rowcount(),
            Cursor::Debug(cursor) => cursor.rowcount(),
        }
    }

    pub fn close(&mut self) -> Result<(), Error> {
        match self {
            Cursor::Plain(cursor) => cursor.close(),
            Cursor::Debug(cursor) => cursor.close(),
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Cursor::Debug(_))
    }

    pub fn as_debug_mut(&mut self) -> Option<&mut B::DebugCursor> {
        match self {
            Cursor::Debug(cursor) => Some(cursor),
            Cursor::Plain(_) => None,
        }
    }
}

impl<B: Backend> Debug for Cursor<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Plain(cursor) => f.debug_tuple("Plain").field(cursor).finish(),
            Cursor::Debug(cursor) => f.debug_tuple("Debug").field(&**cursor).finish(),
        }
    }
}
