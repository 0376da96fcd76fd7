use std::io;
use std::ops::{Deref, DerefMut};

use crate::backend::{CursorDebugWrapper, CursorWrapper, DebugContext};
use crate::driver::{CopyCursor, CopyStream, CopyToOptions, DriverCursor};
use crate::error::Error;

/// Debug cursor that also records Snowflake bulk-copy calls.
///
/// Everything else is the host's [`CursorDebugWrapper`], reachable through `Deref`.
#[derive(Debug)]
pub struct SnowflakeCursorDebugWrapper<C> {
    inner: CursorDebugWrapper<C>,
}

impl<C: DriverCursor> SnowflakeCursorDebugWrapper<C> {
    pub fn new(cursor: CursorWrapper<C>, context: DebugContext) -> Self {
        Self {
            inner: CursorDebugWrapper::new(cursor, context),
        }
    }
}

impl<C: CopyCursor> SnowflakeCursorDebugWrapper<C> {
    pub fn copy_expert(
        &mut self,
        sql: &str,
        stream: CopyStream<'_>,
        size: Option<usize>,
    ) -> Result<(), Error> {
        let _scope = self.inner.debug_sql::<()>(sql, None, None);
        Ok(self
            .inner
            .cursor_mut()
            .inner_mut()
            .copy_expert(sql, stream, size)?)
    }

    pub fn copy_to(
        &mut self,
        file: &mut dyn io::Write,
        table: &str,
        options: &CopyToOptions,
    ) -> Result<(), Error> {
        let _scope = self
            .inner
            .debug_sql::<()>(&format!("COPY {} TO STDOUT", table), None, None);
        Ok(self
            .inner
            .cursor_mut()
            .inner_mut()
            .copy_to(file, table, options)?)
    }
}

impl<C> Deref for SnowflakeCursorDebugWrapper<C> {
    type Target = CursorDebugWrapper<C>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<C> DerefMut for SnowflakeCursorDebugWrapper<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
