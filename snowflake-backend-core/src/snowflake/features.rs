use crate::backend::DatabaseFeatures;

#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeFeatures;

impl DatabaseFeatures for SnowflakeFeatures {
    fn uses_savepoints(&self) -> bool {
        false
    }

    fn supports_sequence_reset(&self) -> bool {
        false
    }

    // accepted in DDL but never enforced
    fn supports_column_check_constraints(&self) -> bool {
        false
    }
}
