//! The host's plugin contract.
//!
//! A backend implements [`Backend`] and supplies one type per collaborator
//! contract; [`DatabaseWrapper`] wires them together and owns the live
//! driver connection.

use std::ops::DerefMut;

use crate::driver::{Driver, DriverConnection, DriverError};
use crate::error::Error;
use crate::settings::DatabaseSettings;

mod asyncio;
mod client;
mod creation;
mod cursor;
mod features;
mod introspection;
mod operations;
mod schema;
mod template;
mod wrapper;

pub use asyncio::{async_unsafe, ALLOW_ASYNC_UNSAFE_ENV};
pub use client::DatabaseClient;
pub use creation::{DatabaseCreation, TEST_DATABASE_PREFIX};
pub use cursor::{Cursor, CursorDebugWrapper, CursorWrapper, DebugContext};
pub use features::DatabaseFeatures;
pub use introspection::{DatabaseIntrospection, TableInfo, TableKind};
pub use operations::DatabaseOperations;
pub use schema::SchemaEditor;
pub use template::{interpolate, TemplateMap};
pub use wrapper::DatabaseWrapper;

/// Connection parameters accepted by the backend's driver.
pub type ParamsOf<B> = <<B as Backend>::Driver as Driver>::Params;

/// Live driver connection type of a backend.
pub type ConnectionOf<B> = <<B as Backend>::Driver as Driver>::Connection;

/// Driver cursor type of a backend.
pub type CursorOf<B> = <ConnectionOf<B> as DriverConnection>::Cursor;

/// The extension points a database backend fills in.
///
/// Hooks that talk to the driver run synchronously and may block; see
/// [`async_unsafe`].
pub trait Backend: Sized + Send + 'static {
    type Driver: Driver;

    type Features: DatabaseFeatures + Default;
    type Operations: DatabaseOperations + Default;
    type Introspection: DatabaseIntrospection + Default;
    type Creation: DatabaseCreation + Default;
    type Client: DatabaseClient + Default;
    type SchemaEditor: SchemaEditor + Default;

    /// Cursor handed out while queries are being logged.
    type DebugCursor: DerefMut<Target = CursorDebugWrapper<CursorOf<Self>>> + Send;

    /// Short vendor identifier, e.g. `"snowflake"`.
    const VENDOR: &'static str;

    /// Human-readable vendor name.
    const DISPLAY_NAME: &'static str;

    fn driver(&self) -> &Self::Driver;

    /// Column type templates keyed by field kind.
    fn data_types(&self) -> &'static TemplateMap;

    /// Check constraint templates keyed by field kind.
    fn data_type_check_constraints(&self) -> &'static TemplateMap;

    /// Right-hand side SQL for each lookup, with a `%s` bind marker.
    fn operators(&self) -> &'static TemplateMap;

    /// Expression escaping `LIKE` wildcards in a right-hand side that is
    /// itself an expression. `{}` stands for that expression.
    fn pattern_esc(&self) -> &'static str;

    /// Lookup templates used when the right-hand side is an expression.
    fn pattern_ops(&self) -> &'static TemplateMap;

    /// Validates `settings` and produces driver connection parameters.
    fn get_connection_params(&self, settings: &DatabaseSettings) -> Result<ParamsOf<Self>, Error>;

    /// Opens a new driver connection.
    fn get_new_connection(&self, params: &ParamsOf<Self>) -> Result<ConnectionOf<Self>, Error>;

    /// Prepares session state on a freshly opened connection.
    fn init_connection_state(&self, _conn: &mut ConnectionOf<Self>) -> Result<(), Error> {
        Ok(())
    }

    fn create_cursor(
        &self,
        conn: &mut ConnectionOf<Self>,
        name: Option<&str>,
    ) -> Result<CursorOf<Self>, Error>;

    fn set_autocommit(&self, conn: &mut ConnectionOf<Self>, autocommit: bool) -> Result<(), Error>;

    fn get_autocommit(&self, conn: &ConnectionOf<Self>) -> bool {
        conn.autocommit()
    }

    /// Returns `false` if the connection can no longer be used. Never fails.
    fn is_usable(&self, conn: &mut ConnectionOf<Self>) -> bool;

    fn make_debug_cursor(
        &self,
        cursor: CursorWrapper<CursorOf<Self>>,
        context: DebugContext,
    ) -> Self::DebugCursor;
}

/// Translates driver errors into [`Error::Database`].
pub fn wrap_database_errors<T>(result: Result<T, DriverError>) -> Result<T, Error> {
    result.map_err(|err| Error::Database(Box::new(err)))
}
