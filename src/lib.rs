#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use snowflake_backend_core::backend::{
    self, Backend, Cursor, DatabaseClient, DatabaseCreation, DatabaseFeatures,
    DatabaseIntrospection, DatabaseOperations, DatabaseWrapper, SchemaEditor,
};
pub use snowflake_backend_core::driver::{
    self, CopyCursor, Driver, DriverConnection, DriverCursor, DriverError,
};
pub use snowflake_backend_core::error::{self, DatabaseError, Error, ErrorKind, Result};
pub use snowflake_backend_core::logger::{self, LogSettings, LoggedQuery};
pub use snowflake_backend_core::settings::{self, DatabaseSettings};

pub mod snowflake {
    pub use snowflake_backend_core::snowflake::*;
}

#[cfg(feature = "testing")]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub use snowflake_backend_core::testing;
