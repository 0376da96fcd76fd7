use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::LevelFilter;

/// Target every statement record is logged under.
pub const LOG_TARGET: &str = "db.backends";

/// Maximum number of entries kept in a [`QueryLog`].
pub const QUERIES_LIMIT: usize = 9000;

#[derive(Clone, Debug)]
pub struct LogSettings {
    pub(crate) statements_level: LevelFilter,
    pub(crate) slow_statements_level: LevelFilter,
    pub(crate) slow_statements_duration: Duration,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            statements_level: LevelFilter::Debug,
            slow_statements_level: LevelFilter::Warn,
            slow_statements_duration: Duration::from_secs(1),
        }
    }
}

impl LogSettings {
    pub fn log_statements(&mut self, level: LevelFilter) -> &mut Self {
        self.statements_level = level;
        self
    }

    pub fn log_slow_statements(&mut self, level: LevelFilter, duration: Duration) -> &mut Self {
        self.slow_statements_level = level;
        self.slow_statements_duration = duration;
        self
    }

    fn level_for(&self, elapsed: Duration) -> LevelFilter {
        if elapsed >= self.slow_statements_duration {
            self.slow_statements_level
        } else {
            self.statements_level
        }
    }
}

/// One statement recorded by a debug cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedQuery {
    pub sql: String,
    pub time: Duration,
}

impl LoggedQuery {
    /// Elapsed time in seconds, with millisecond precision.
    pub fn time_display(&self) -> String {
        format!("{:.3}", self.time.as_secs_f64())
    }
}

/// Bounded log of executed statements shared by a connection and its debug cursors.
#[derive(Clone, Default)]
pub struct QueryLog {
    entries: Arc<Mutex<VecDeque<LoggedQuery>>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LoggedQuery>> {
        // a panic while logging never leaves the deque half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, query: LoggedQuery) {
        let mut entries = self.lock();
        if entries.len() == QUERIES_LIMIT {
            entries.pop_front();
        }
        entries.push_back(query);
    }

    pub fn snapshot(&self) -> Vec<LoggedQuery> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Debug for QueryLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryLog").field("len", &self.len()).finish()
    }
}

/// Scope guard around one statement. The record is written when the guard
/// is dropped, so it is emitted exactly once on every exit path.
pub struct QueryLogger {
    sql: String,
    params: String,
    many: Option<usize>,
    alias: Arc<str>,
    settings: LogSettings,
    log: QueryLog,
    start: Instant,
}

impl QueryLogger {
    pub(crate) fn new(
        sql: String,
        params: String,
        many: Option<usize>,
        alias: Arc<str>,
        settings: LogSettings,
        log: QueryLog,
    ) -> Self {
        Self {
            sql,
            params,
            many,
            alias,
            settings,
            log,
            start: Instant::now(),
        }
    }

    fn finish(&mut self) {
        let elapsed = self.start.elapsed();

        let sql = match self.many {
            Some(times) => format!("{} times: {}", times, self.sql),
            None => std::mem::take(&mut self.sql),
        };

        if let Some(lvl) = self
            .settings
            .level_for(elapsed)
            .to_level()
            .filter(|lvl| log::log_enabled!(target: LOG_TARGET, *lvl))
        {
            log::log!(
                target: LOG_TARGET,
                lvl,
                "({:.3}) {}; args={}; alias={}",
                elapsed.as_secs_f64(),
                sql,
                self.params,
                self.alias
            );
        }

        self.log.push(LoggedQuery { sql, time: elapsed });
    }
}

impl Drop for QueryLogger {
    fn drop(&mut self) {
        self.finish();
    }
}
