//! **Snowflake** backend.
//!
//! Plugs a Snowflake driver binding into the host's [`Backend`] contract.
//! The binding must accept [`SnowflakeConnectOptions`] as its connection
//! parameters.

use crate::backend::{
    async_unsafe, wrap_database_errors, Backend, CursorWrapper, DebugContext, TemplateMap,
};
use crate::driver::{Driver, DriverConnection, DriverCursor};
use crate::error::Error;
use crate::settings::DatabaseSettings;

mod client;
mod creation;
mod debug;
mod features;
mod introspection;
mod operations;
mod options;
mod schema;
mod tables;
mod type_info;

pub use client::{SnowflakeClient, PASSWORD_ENV};
pub use creation::SnowflakeCreation;
pub use debug::SnowflakeCursorDebugWrapper;
pub use features::SnowflakeFeatures;
pub use introspection::SnowflakeIntrospection;
pub use operations::SnowflakeOperations;
pub use options::{MissingSetting, SnowflakeConnectOptions};
pub use schema::SnowflakeSchemaEditor;
pub use type_info::SnowflakeType;

/// Statement used by the liveness check.
pub const LIVENESS_SQL: &str = "SELECT current_version()";

/// An alias for [`DatabaseWrapper`][crate::backend::DatabaseWrapper], specialized for Snowflake.
pub type SnowflakeDatabaseWrapper<D> = crate::backend::DatabaseWrapper<SnowflakeBackend<D>>;

type SnowflakeCursor<D> = <<D as Driver>::Connection as DriverConnection>::Cursor;

#[derive(Debug, Clone, Default)]
pub struct SnowflakeBackend<D> {
    driver: D,
}

impl<D> SnowflakeBackend<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }
}

impl<D> Backend for SnowflakeBackend<D>
where
    D: Driver<Params = SnowflakeConnectOptions>,
{
    type Driver = D;

    type Features = SnowflakeFeatures;
    type Operations = SnowflakeOperations;
    type Introspection = SnowflakeIntrospection;
    type Creation = SnowflakeCreation;
    type Client = SnowflakeClient;
    type SchemaEditor = SnowflakeSchemaEditor;

    type DebugCursor = SnowflakeCursorDebugWrapper<SnowflakeCursor<D>>;

    const VENDOR: &'static str = "snowflake";
    const DISPLAY_NAME: &'static str = "Snowflake";

    fn driver(&self) -> &D {
        &self.driver
    }

    fn data_types(&self) -> &'static TemplateMap {
        &tables::DATA_TYPES
    }

    fn data_type_check_constraints(&self) -> &'static TemplateMap {
        &tables::DATA_TYPE_CHECK_CONSTRAINTS
    }

    fn operators(&self) -> &'static TemplateMap {
        &tables::OPERATORS
    }

    fn pattern_esc(&self) -> &'static str {
        tables::PATTERN_ESC
    }

    fn pattern_ops(&self) -> &'static TemplateMap {
        &tables::PATTERN_OPS
    }

    fn get_connection_params(
        &self,
        settings: &DatabaseSettings,
    ) -> Result<SnowflakeConnectOptions, Error> {
        SnowflakeConnectOptions::from_settings(settings)
    }

    fn get_new_connection(&self, params: &SnowflakeConnectOptions) -> Result<D::Connection, Error> {
        async_unsafe("get_new_connection")?;
        Ok(self.driver.connect(params)?)
    }

    fn create_cursor(
        &self,
        conn: &mut D::Connection,
        _name: Option<&str>,
    ) -> Result<SnowflakeCursor<D>, Error> {
        async_unsafe("create_cursor")?;
        Ok(conn.cursor()?)
    }

    fn set_autocommit(&self, conn: &mut D::Connection, autocommit: bool) -> Result<(), Error> {
        wrap_database_errors(conn.set_autocommit(autocommit))
    }

    fn is_usable(&self, conn: &mut D::Connection) -> bool {
        let probe = conn.cursor().and_then(|mut cursor| {
            let executed = cursor.execute(LIVENESS_SQL, &[]);
            let closed = cursor.close();
            executed.and(closed)
        });

        match probe {
            Ok(()) => true,
            Err(err) => {
                log::debug!("liveness check failed: {}", err);
                false
            }
        }
    }

    fn make_debug_cursor(
        &self,
        cursor: CursorWrapper<SnowflakeCursor<D>>,
        context: DebugContext,
    ) -> Self::DebugCursor {
        SnowflakeCursorDebugWrapper::new(cursor, context)
    }
}
