use crate::backend::{DatabaseCreation, DatabaseOperations};

#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeCreation;

impl DatabaseCreation for SnowflakeCreation {
    fn sql_destroy_test_db(&self, ops: &dyn DatabaseOperations, name: &str) -> String {
        format!("DROP DATABASE IF EXISTS {}", ops.quote_name(name))
    }
}
