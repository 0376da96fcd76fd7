use crate::backend::DatabaseOperations;
use crate::settings::DatabaseSettings;

/// Prefix for generated test database names.
pub const TEST_DATABASE_PREFIX: &str = "test_";

/// Creates and destroys test databases.
pub trait DatabaseCreation {
    fn test_db_name(&self, settings: &DatabaseSettings) -> String {
        match &settings.test.name {
            Some(name) => name.clone(),
            None => format!(
                "{}{}",
                TEST_DATABASE_PREFIX,
                settings.database.as_deref().unwrap_or_default()
            ),
        }
    }

    fn sql_create_test_db(&self, ops: &dyn DatabaseOperations, name: &str) -> String {
        format!("CREATE DATABASE {}", ops.quote_name(name))
    }

    fn sql_destroy_test_db(&self, ops: &dyn DatabaseOperations, name: &str) -> String {
        format!("DROP DATABASE {}", ops.quote_name(name))
    }
}
