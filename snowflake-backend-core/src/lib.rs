//! Core of the Snowflake backend.
//! Not intended to be used directly.
#![warn(future_incompatible, rust_2018_idioms)]
#![forbid(unsafe_code)]
#![allow(clippy::type_complexity)]

pub mod backend;
pub mod driver;
pub mod error;
pub mod logger;
pub mod settings;
pub mod snowflake;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
