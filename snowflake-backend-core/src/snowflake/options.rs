use std::fmt::{self, Debug, Formatter};

use indexmap::IndexMap;

use crate::error::Error;
use crate::settings::DatabaseSettings;

/// Settings keys that must be present, in validation order, with the message
/// reported when one is missing.
const REQUIRED: [(&str, &str); 7] = [
    ("DATABASE", "Please provide a database name for snowflake!"),
    ("USER", "Please provide a username for snowflake!"),
    ("PASSWORD", "Please provide a password for snowflake!"),
    ("ACCOUNT", "Please provide an account for snowflake!"),
    ("WAREHOUSE", "Please provide a warehouse for snowflake!"),
    ("ROLE", "Please provide a role for snowflake!"),
    ("SCHEMA", "Please provide a schema for snowflake!"),
];

/// A required connection setting was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MissingSetting {
    pub key: &'static str,
    pub message: &'static str,
}

/// The resolved parameters handed to the driver's `connect`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SnowflakeConnectOptions {
    pub(crate) database: String,
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) account: String,
    pub(crate) warehouse: String,
    pub(crate) role: String,
    pub(crate) schema: String,
}

impl SnowflakeConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `settings`, failing on the first missing key.
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self, Error> {
        let [database, user, password, account, warehouse, role, schema] = REQUIRED;

        Ok(Self {
            database: require(settings, database)?,
            user: require(settings, user)?,
            password: require(settings, password)?,
            account: require(settings, account)?,
            warehouse: require(settings, warehouse)?,
            role: require(settings, role)?,
            schema: require(settings, schema)?,
        })
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = warehouse.into();
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn get_database(&self) -> &str {
        &self.database
    }

    pub fn get_user(&self) -> &str {
        &self.user
    }

    pub fn get_password(&self) -> &str {
        &self.password
    }

    pub fn get_account(&self) -> &str {
        &self.account
    }

    pub fn get_warehouse(&self) -> &str {
        &self.warehouse
    }

    pub fn get_role(&self) -> &str {
        &self.role
    }

    pub fn get_schema(&self) -> &str {
        &self.schema
    }

    /// The driver keyword arguments, in a fixed order.
    pub fn as_params(&self) -> IndexMap<&'static str, &str> {
        IndexMap::from([
            ("database", self.database.as_str()),
            ("user", self.user.as_str()),
            ("password", self.password.as_str()),
            ("account", self.account.as_str()),
            ("warehouse", self.warehouse.as_str()),
            ("role", self.role.as_str()),
            ("schema", self.schema.as_str()),
        ])
    }
}

impl Debug for SnowflakeConnectOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeConnectOptions")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("account", &self.account)
            .field("warehouse", &self.warehouse)
            .field("role", &self.role)
            .field("schema", &self.schema)
            .finish()
    }
}

fn require(
    settings: &DatabaseSettings,
    (key, message): (&'static str, &'static str),
) -> Result<String, Error> {
    settings
        .get(key)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::config(MissingSetting { key, message }))
}
