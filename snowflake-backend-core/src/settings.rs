//! The connection settings record consumed by the backend.
//!
//! A [`DatabaseSettings`] can be deserialized from JSON, read from the
//! environment (with `.env` support), or parsed from a connection URL:
//!
//! ```text
//! snowflake://[user[:password]@]account[.snowflakecomputing.com][/database[/schema]][?warehouse=..&role=..]
//! ```

use std::env;
use std::fmt::{self, Debug, Formatter};
use std::str::FromStr;

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

const ACCOUNT_HOST_SUFFIX: &str = ".snowflakecomputing.com";

/// Settings for one database alias. Keys are upper-case when serialized.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DatabaseSettings {
    pub engine: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    pub schema: Option<String>,
    pub autocommit: bool,
    /// Seconds a connection may be reused. `None` keeps it open indefinitely.
    pub conn_max_age: Option<u64>,
    pub conn_health_checks: bool,
    pub time_zone: Option<String>,
    pub options: IndexMap<String, serde_json::Value>,
    pub test: TestSettings,
}

/// Settings used when creating the test database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct TestSettings {
    pub name: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            engine: None,
            database: None,
            user: None,
            password: None,
            account: None,
            warehouse: None,
            role: None,
            schema: None,
            autocommit: true,
            conn_max_age: Some(0),
            conn_health_checks: false,
            time_zone: None,
            options: IndexMap::new(),
            test: TestSettings::default(),
        }
    }
}

impl DatabaseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up one of the string-valued connection keys by its upper-case name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "ENGINE" => &self.engine,
            "DATABASE" => &self.database,
            "USER" => &self.user,
            "PASSWORD" => &self.password,
            "ACCOUNT" => &self.account,
            "WAREHOUSE" => &self.warehouse,
            "ROLE" => &self.role,
            "SCHEMA" => &self.schema,
            "TIME_ZONE" => &self.time_zone,
            _ => return None,
        };

        value.as_deref()
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }

    pub fn conn_max_age(mut self, seconds: Option<u64>) -> Self {
        self.conn_max_age = seconds;
        self
    }

    pub fn conn_health_checks(mut self, enabled: bool) -> Self {
        self.conn_health_checks = enabled;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `SNOWFLAKE_<KEY>` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_prefixed("SNOWFLAKE_")
    }

    pub fn from_env_prefixed(prefix: &str) -> Result<Self, Error> {
        // a missing .env file is not an error
        let _ = dotenvy::dotenv();

        let var = |key: &str| env::var(format!("{}{}", prefix, key)).ok();

        let mut settings = Self {
            engine: var("ENGINE"),
            database: var("DATABASE"),
            user: var("USER"),
            password: var("PASSWORD"),
            account: var("ACCOUNT"),
            warehouse: var("WAREHOUSE"),
            role: var("ROLE"),
            schema: var("SCHEMA"),
            time_zone: var("TIME_ZONE"),
            ..Self::default()
        };

        if let Some(value) = var("AUTOCOMMIT") {
            settings.autocommit = parse_bool("AUTOCOMMIT", &value)?;
        }
        if let Some(value) = var("CONN_MAX_AGE") {
            settings.conn_max_age = parse_max_age(&value)?;
        }
        if let Some(value) = var("CONN_HEALTH_CHECKS") {
            settings.conn_health_checks = parse_bool("CONN_HEALTH_CHECKS", &value)?;
        }
        if let Some(value) = var("TEST_NAME") {
            settings.test.name = Some(value);
        }

        Ok(settings)
    }

    pub fn from_url(url: &Url) -> Result<Self, Error> {
        if url.scheme() != "snowflake" {
            return Err(Error::Configuration(
                format!("unsupported URL scheme `{}`, expected `snowflake`", url.scheme()).into(),
            ));
        }

        let mut settings = Self::default();

        if let Some(host) = url.host_str() {
            let account = host.strip_suffix(ACCOUNT_HOST_SUFFIX).unwrap_or(host);
            settings.account = Some(account.to_owned());
        }

        if !url.username().is_empty() {
            settings.user = Some(decode(url.username())?);
        }

        if let Some(password) = url.password() {
            settings.password = Some(decode(password)?);
        }

        // path is `/database[/schema]`
        let mut segments = url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty());
        if let Some(database) = segments.next() {
            settings.database = Some(decode(database)?);
        }
        if let Some(schema) = segments.next() {
            settings.schema = Some(decode(schema)?);
        }

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "warehouse" => settings.warehouse = Some(value.into_owned()),
                "database" | "db" => settings.database = Some(value.into_owned()),
                "schema" => settings.schema = Some(value.into_owned()),
                "role" => settings.role = Some(value.into_owned()),
                "autocommit" => settings.autocommit = parse_bool("autocommit", &value)?,
                "conn_max_age" => settings.conn_max_age = parse_max_age(&value)?,
                "time_zone" => settings.time_zone = Some(value.into_owned()),
                _ => {
                    settings
                        .options
                        .insert(key.into_owned(), serde_json::Value::String(value.into_owned()));
                }
            }
        }

        Ok(settings)
    }
}

impl FromStr for DatabaseSettings {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s)?;
        Self::from_url(&url)
    }
}

impl Debug for DatabaseSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("engine", &self.engine)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("account", &self.account)
            .field("warehouse", &self.warehouse)
            .field("role", &self.role)
            .field("schema", &self.schema)
            .field("autocommit", &self.autocommit)
            .field("conn_max_age", &self.conn_max_age)
            .field("conn_health_checks", &self.conn_health_checks)
            .field("time_zone", &self.time_zone)
            .field("options", &self.options)
            .field("test", &self.test)
            .finish()
    }
}

fn decode(raw: &str) -> Result<String, Error> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(Error::config)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Configuration(
            format!("{} must be a boolean, got `{}`", key, value).into(),
        )),
    }
}

/// An empty value or `none` means "never expire".
fn parse_max_age(value: &str) -> Result<Option<u64>, Error> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    value.parse().map(Some).map_err(Error::config)
}
