//! A scripted in-memory driver for exercising the backend without a warehouse.
//!
//! Every connection and cursor opened from a [`MockDriver`] shares its state,
//! so a test can script failures and results up front and inspect what the
//! backend sent afterwards.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use crate::driver::{
    CopyCursor, CopyStream, CopyToOptions, Driver, DriverConnection, DriverCursor, DriverError,
    Row,
};
use crate::snowflake::SnowflakeConnectOptions;

/// A bulk-copy call received by a [`MockCursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyCall {
    Expert {
        sql: String,
        size: Option<usize>,
        /// Bytes read from a `CopyStream::Read`.
        data: Vec<u8>,
    },
    To {
        table: String,
        options: CopyToOptions,
    },
}

#[derive(Debug, Default)]
struct State {
    connects: usize,
    last_params: Option<SnowflakeConnectOptions>,
    connect_error: Option<DriverError>,
    autocommit_error: Option<DriverError>,
    failures: IndexMap<String, DriverError>,
    results: IndexMap<String, Vec<Row>>,
    executed: Vec<String>,
    copies: Vec<CopyCall>,
    commits: usize,
    rollbacks: usize,
    closed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<State>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    /// Makes every following `connect` fail with `err`.
    pub fn fail_connect(&self, err: DriverError) {
        self.lock().connect_error = Some(err);
    }

    /// Makes `set_autocommit` fail with `err`, or succeed again with `None`.
    pub fn fail_autocommit(&self, err: Option<DriverError>) {
        self.lock().autocommit_error = err;
    }

    /// Makes executing (or copying with) `sql` fail with `err`.
    pub fn fail_on(&self, sql: impl Into<String>, err: DriverError) {
        self.lock().failures.insert(sql.into(), err);
    }

    /// Rows produced by `sql`.
    pub fn returning(&self, sql: impl Into<String>, rows: Vec<Row>) {
        self.lock().results.insert(sql.into(), rows);
    }

    pub fn connect_count(&self) -> usize {
        self.lock().connects
    }

    pub fn last_params(&self) -> Option<SnowflakeConnectOptions> {
        self.lock().last_params.clone()
    }

    /// Every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.lock().executed.clone()
    }

    pub fn copies(&self) -> Vec<CopyCall> {
        self.lock().copies.clone()
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    /// Number of connections closed explicitly.
    pub fn closed_connections(&self) -> usize {
        self.lock().closed
    }
}

impl Driver for MockDriver {
    type Params = SnowflakeConnectOptions;
    type Connection = MockConnection;

    fn connect(&self, params: &SnowflakeConnectOptions) -> Result<MockConnection, DriverError> {
        let mut state = self.lock();
        state.connects += 1;
        state.last_params = Some(params.clone());

        if let Some(err) = &state.connect_error {
            return Err(err.clone());
        }

        Ok(MockConnection {
            state: self.state.clone(),
            autocommit: true,
            closed: false,
        })
    }
}

#[derive(Debug)]
pub struct MockConnection {
    state: Arc<Mutex<State>>,
    autocommit: bool,
    closed: bool,
}

impl MockConnection {
    fn check_open(&self) -> Result<(), DriverError> {
        if self.closed {
            return Err(DriverError::new("Connection is closed").with_code("250002"));
        }

        Ok(())
    }
}

impl DriverConnection for MockConnection {
    type Cursor = MockCursor;

    fn cursor(&mut self) -> Result<MockCursor, DriverError> {
        self.check_open()?;

        Ok(MockCursor {
            state: self.state.clone(),
            rows: VecDeque::new(),
            rowcount: None,
        })
    }

    fn autocommit(&self) -> bool {
        self.autocommit
    }

    fn set_autocommit(&mut self, autocommit: bool) -> Result<(), DriverError> {
        self.check_open()?;

        if let Some(err) = &lock(&self.state).autocommit_error {
            return Err(err.clone());
        }

        self.autocommit = autocommit;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.check_open()?;
        lock(&self.state).commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.check_open()?;
        lock(&self.state).rollbacks += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        if !self.closed {
            self.closed = true;
            lock(&self.state).closed += 1;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct MockCursor {
    state: Arc<Mutex<State>>,
    rows: VecDeque<Row>,
    rowcount: Option<u64>,
}

impl MockCursor {
    fn run(&mut self, sql: &str) -> Result<(), DriverError> {
        let mut state = lock(&self.state);
        state.executed.push(sql.to_owned());

        if let Some(err) = state.failures.get(sql) {
            return Err(err.clone());
        }

        self.rows = state.results.get(sql).cloned().unwrap_or_default().into();
        self.rowcount = Some(self.rows.len() as u64);

        Ok(())
    }
}

impl DriverCursor for MockCursor {
    fn execute(&mut self, sql: &str, _params: &[serde_json::Value]) -> Result<(), DriverError> {
        self.run(sql)
    }

    fn fetchone(&mut self) -> Result<Option<Row>, DriverError> {
        Ok(self.rows.pop_front())
    }

    fn fetchall(&mut self) -> Result<Vec<Row>, DriverError> {
        Ok(self.rows.drain(..).collect())
    }

    fn rowcount(&self) -> Option<u64> {
        self.rowcount
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.rows.clear();
        Ok(())
    }
}

impl CopyCursor for MockCursor {
    fn copy_expert(
        &mut self,
        sql: &str,
        stream: CopyStream<'_>,
        size: Option<usize>,
    ) -> Result<(), DriverError> {
        let mut data = Vec::new();
        if let CopyStream::Read(reader) = stream {
            reader
                .read_to_end(&mut data)
                .map_err(|err| DriverError::new(err.to_string()))?;
        }

        let mut state = lock(&self.state);
        state.copies.push(CopyCall::Expert {
            sql: sql.to_owned(),
            size,
            data,
        });

        match state.failures.get(sql) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn copy_to(
        &mut self,
        file: &mut dyn io::Write,
        table: &str,
        options: &CopyToOptions,
    ) -> Result<(), DriverError> {
        let key = format!("COPY {} TO STDOUT", table);

        let rows = {
            let mut state = lock(&self.state);
            state.copies.push(CopyCall::To {
                table: table.to_owned(),
                options: options.clone(),
            });

            if let Some(err) = state.failures.get(&key) {
                return Err(err.clone());
            }

            state.results.get(&key).cloned().unwrap_or_default()
        };

        for row in rows {
            let line = row
                .iter()
                .map(|value| match value {
                    serde_json::Value::Null => options.null.clone(),
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(&options.sep);

            writeln!(file, "{}", line).map_err(|err| DriverError::new(err.to_string()))?;
        }

        Ok(())
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
