/// Capability flags the host consults before generating SQL.
///
/// The provided values are the host defaults; backends override what differs.
pub trait DatabaseFeatures {
    fn supports_transactions(&self) -> bool {
        true
    }

    fn uses_savepoints(&self) -> bool {
        true
    }

    fn can_rollback_ddl(&self) -> bool {
        false
    }

    fn can_return_columns_from_insert(&self) -> bool {
        false
    }

    fn has_select_for_update(&self) -> bool {
        false
    }

    fn supports_timezones(&self) -> bool {
        true
    }

    fn supports_json_field(&self) -> bool {
        true
    }

    fn supports_sequence_reset(&self) -> bool {
        true
    }

    fn supports_foreign_keys(&self) -> bool {
        true
    }

    fn supports_column_check_constraints(&self) -> bool {
        true
    }

    fn interprets_empty_strings_as_nulls(&self) -> bool {
        false
    }
}
