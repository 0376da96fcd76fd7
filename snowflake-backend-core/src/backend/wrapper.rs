use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::template::interpolate;
use crate::backend::{
    wrap_database_errors, Backend, ConnectionOf, Cursor, CursorOf, CursorWrapper, DebugContext,
    ParamsOf, TemplateMap,
};
use crate::driver::DriverConnection;
use crate::error::Error;
use crate::logger::{LogSettings, LoggedQuery, QueryLog, LOG_TARGET};
use crate::settings::DatabaseSettings;

const SERVER_VERSION_SQL: &str = "SELECT current_version()";

/// Manages the single driver connection of one database alias.
///
/// The connection is opened lazily by the first operation that needs it and
/// is owned exclusively by the wrapper.
pub struct DatabaseWrapper<B: Backend> {
    backend: B,
    settings: DatabaseSettings,
    alias: Arc<str>,
    connection: Option<ConnectionOf<B>>,

    autocommit: bool,
    errors_occurred: bool,
    health_check_done: bool,
    close_at: Option<Instant>,
    server_version: Option<String>,

    /// Log statements even when `db.backends` debug logging is disabled.
    pub force_debug_cursor: bool,
    queries_log: QueryLog,
    log_settings: LogSettings,

    features: B::Features,
    ops: B::Operations,
    introspection: B::Introspection,
    creation: B::Creation,
    client: B::Client,
    schema_editor: B::SchemaEditor,
}

impl<B: Backend> DatabaseWrapper<B> {
    pub fn new(backend: B, settings: DatabaseSettings, alias: &str) -> Self {
        Self {
            backend,
            settings,
            alias: Arc::from(alias),
            connection: None,
            autocommit: false,
            errors_occurred: false,
            health_check_done: false,
            close_at: None,
            server_version: None,
            force_debug_cursor: false,
            queries_log: QueryLog::new(),
            log_settings: LogSettings::default(),
            features: Default::default(),
            ops: Default::default(),
            introspection: Default::default(),
            creation: Default::default(),
            client: Default::default(),
            schema_editor: Default::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn vendor(&self) -> &'static str {
        B::VENDOR
    }

    pub fn display_name(&self) -> &'static str {
        B::DISPLAY_NAME
    }

    pub fn log_settings_mut(&mut self) -> &mut LogSettings {
        &mut self.log_settings
    }

    pub fn get_connection_params(&self) -> Result<ParamsOf<B>, Error> {
        self.backend.get_connection_params(&self.settings)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Opens a new connection, replacing the current one.
    pub fn connect(&mut self) -> Result<(), Error> {
        if self.connection.is_some() {
            self.close()?;
        }

        let params = self.get_connection_params()?;

        self.errors_occurred = false;
        self.health_check_done = false;
        self.close_at = self
            .settings
            .conn_max_age
            // an age past the clock's range never expires
            .and_then(|max_age| Instant::now().checked_add(Duration::from_secs(max_age)));

        log::debug!(
            "opening {} connection for alias `{}`",
            B::DISPLAY_NAME,
            self.alias
        );

        let mut conn = self.backend.get_new_connection(&params)?;

        if let Err(err) = self.prepare_connection(&mut conn) {
            if let Err(close_err) = conn.close() {
                log::debug!("failed to close connection after setup error: {}", close_err);
            }
            return Err(err);
        }

        self.connection = Some(conn);

        Ok(())
    }

    fn prepare_connection(&mut self, conn: &mut ConnectionOf<B>) -> Result<(), Error> {
        self.backend.set_autocommit(conn, self.settings.autocommit)?;
        self.autocommit = self.settings.autocommit;
        self.backend.init_connection_state(conn)
    }

    pub fn ensure_connection(&mut self) -> Result<(), Error> {
        if self.connection.is_none() {
            self.connect()?;
        }

        Ok(())
    }

    /// The live driver connection, opening it if necessary.
    pub fn connection(&mut self) -> Result<&mut ConnectionOf<B>, Error> {
        self.ensure_connection()?;
        self.connection.as_mut().ok_or(Error::ConnectionClosed)
    }

    /// Whether cursors handed out by [`cursor`][Self::cursor] record their statements.
    pub fn queries_logged(&self) -> bool {
        self.force_debug_cursor || log::log_enabled!(target: LOG_TARGET, log::Level::Debug)
    }

    pub fn cursor(&mut self) -> Result<Cursor<B>, Error> {
        let cursor = self.prepare_cursor()?;

        if self.queries_logged() {
            let context = self.debug_context();
            Ok(Cursor::Debug(self.backend.make_debug_cursor(cursor, context)))
        } else {
            Ok(Cursor::Plain(cursor))
        }
    }

    /// A cursor that records its statements regardless of [`queries_logged`][Self::queries_logged].
    pub fn debug_cursor(&mut self) -> Result<B::DebugCursor, Error> {
        let cursor = self.prepare_cursor()?;
        let context = self.debug_context();
        Ok(self.backend.make_debug_cursor(cursor, context))
    }

    fn prepare_cursor(&mut self) -> Result<CursorWrapper<CursorOf<B>>, Error> {
        self.close_if_health_check_failed()?;
        self.ensure_connection()?;

        let conn = self.connection.as_mut().ok_or(Error::ConnectionClosed)?;
        let cursor = self.backend.create_cursor(conn, None)?;

        Ok(CursorWrapper::new(cursor))
    }

    fn debug_context(&self) -> DebugContext {
        DebugContext::new(
            self.alias.clone(),
            self.log_settings.clone(),
            self.queries_log.clone(),
        )
    }

    pub fn set_autocommit(&mut self, autocommit: bool) -> Result<(), Error> {
        self.ensure_connection()?;

        let conn = self.connection.as_mut().ok_or(Error::ConnectionClosed)?;
        if let Err(err) = self.backend.set_autocommit(conn, autocommit) {
            self.errors_occurred = true;
            return Err(err);
        }

        self.autocommit = autocommit;

        Ok(())
    }

    pub fn get_autocommit(&mut self) -> Result<bool, Error> {
        self.ensure_connection()?;
        Ok(self.autocommit)
    }

    pub fn commit(&mut self) -> Result<(), Error> {
        match self.connection.as_mut() {
            Some(conn) => wrap_database_errors(conn.commit()),
            None => Ok(()),
        }
    }

    pub fn rollback(&mut self) -> Result<(), Error> {
        match self.connection.as_mut() {
            Some(conn) => wrap_database_errors(conn.rollback()),
            None => Ok(()),
        }
    }

    /// Runs the backend's liveness check. `false` when there is no connection.
    pub fn is_usable(&mut self) -> bool {
        match self.connection.as_mut() {
            Some(conn) => self.backend.is_usable(conn),
            None => false,
        }
    }

    /// Closes the connection. The wrapper forgets it even when closing fails.
    pub fn close(&mut self) -> Result<(), Error> {
        let mut conn = match self.connection.take() {
            Some(conn) => conn,
            None => return Ok(()),
        };

        self.server_version = None;

        log::debug!("closing connection for alias `{}`", self.alias);

        wrap_database_errors(conn.close())
    }

    /// Closes the connection if a health check is enabled and it fails.
    pub fn close_if_health_check_failed(&mut self) -> Result<(), Error> {
        if self.connection.is_none() || !self.settings.conn_health_checks || self.health_check_done
        {
            return Ok(());
        }

        if !self.is_usable() {
            self.close()?;
        }
        self.health_check_done = true;

        Ok(())
    }

    /// Closes a connection that can no longer be used or has outlived
    /// `CONN_MAX_AGE`.
    pub fn close_if_unusable_or_obsolete(&mut self) -> Result<(), Error> {
        if self.connection.is_none() {
            return Ok(());
        }

        self.health_check_done = false;

        if self.autocommit != self.settings.autocommit {
            return self.close();
        }

        if self.errors_occurred {
            if self.is_usable() {
                self.errors_occurred = false;
                self.health_check_done = true;
            } else {
                return self.close();
            }
        }

        match self.close_at {
            Some(close_at) if Instant::now() >= close_at => self.close(),
            _ => Ok(()),
        }
    }

    /// The server version, queried once per connection.
    pub fn server_version(&mut self) -> Result<&str, Error> {
        if self.server_version.is_none() {
            let version = self.temporary_connection(|cursor| {
                cursor.execute(SERVER_VERSION_SQL, &[])?;
                let row = cursor.fetchone()?;

                Ok(row
                    .and_then(|row| row.into_iter().next())
                    .map(|value| match value {
                        serde_json::Value::String(version) => version,
                        other => other.to_string(),
                    })
                    .unwrap_or_default())
            })?;

            self.server_version = Some(version);
        }

        Ok(self.server_version.as_deref().unwrap_or_default())
    }

    /// Runs `f` with a cursor, closing the connection afterwards if it was
    /// not open before.
    pub fn temporary_connection<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Cursor<B>) -> Result<T, Error>,
    {
        let must_close = self.connection.is_none();

        let result = self.cursor().and_then(|mut cursor| {
            let value = f(&mut cursor)?;
            cursor.close()?;
            Ok(value)
        });

        if must_close {
            let closed = self.close();
            let value = result?;
            closed?;
            return Ok(value);
        }

        result
    }

    /// Statements recorded by debug cursors, oldest first.
    pub fn queries(&self) -> Vec<LoggedQuery> {
        self.queries_log.snapshot()
    }

    pub fn reset_queries(&self) {
        self.queries_log.clear();
    }

    pub fn features(&self) -> &B::Features {
        &self.features
    }

    pub fn ops(&self) -> &B::Operations {
        &self.ops
    }

    pub fn introspection(&self) -> &B::Introspection {
        &self.introspection
    }

    pub fn creation(&self) -> &B::Creation {
        &self.creation
    }

    pub fn client(&self) -> &B::Client {
        &self.client
    }

    pub fn schema_editor(&self) -> &B::SchemaEditor {
        &self.schema_editor
    }

    pub fn data_types(&self) -> &'static TemplateMap {
        self.backend.data_types()
    }

    pub fn data_type_check_constraints(&self) -> &'static TemplateMap {
        self.backend.data_type_check_constraints()
    }

    pub fn operators(&self) -> &'static TemplateMap {
        self.backend.operators()
    }

    pub fn pattern_esc(&self) -> &'static str {
        self.backend.pattern_esc()
    }

    pub fn pattern_ops(&self) -> &'static TemplateMap {
        self.backend.pattern_ops()
    }

    /// Column type for `field_kind`, or `None` for kinds without a column.
    pub fn db_type(
        &self,
        field_kind: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<String>, Error> {
        self.data_types()
            .get(field_kind)
            .map(|template| interpolate(template, params))
            .transpose()
    }

    /// Check constraint for `field_kind` applied to `column`, if the kind has one.
    pub fn db_check(&self, field_kind: &str, column: &str) -> Result<Option<String>, Error> {
        self.data_type_check_constraints()
            .get(field_kind)
            .map(|template| interpolate(template, &[("column", column)]))
            .transpose()
    }
}

impl<B: Backend> Debug for DatabaseWrapper<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseWrapper")
            .field("vendor", &B::VENDOR)
            .field("alias", &self.alias)
            .field("settings", &self.settings)
            .field("connected", &self.connection.is_some())
            .field("autocommit", &self.autocommit)
            .field("errors_occurred", &self.errors_occurred)
            .finish()
    }
}
