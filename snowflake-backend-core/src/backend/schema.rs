use crate::backend::template::interpolate;
use crate::backend::DatabaseOperations;
use crate::error::Error;

/// DDL templates used when applying schema changes.
///
/// Every template uses `%(name)s` placeholders; identifiers are quoted with
/// the backend's [`DatabaseOperations::quote_name`] before interpolation.
pub trait SchemaEditor {
    fn sql_create_table(&self) -> &'static str {
        "CREATE TABLE %(table)s (%(definition)s)"
    }

    fn sql_rename_table(&self) -> &'static str {
        "ALTER TABLE %(old_table)s RENAME TO %(new_table)s"
    }

    fn sql_delete_table(&self) -> &'static str {
        "DROP TABLE %(table)s CASCADE"
    }

    fn sql_create_column(&self) -> &'static str {
        "ALTER TABLE %(table)s ADD COLUMN %(column)s %(definition)s"
    }

    fn sql_delete_column(&self) -> &'static str {
        "ALTER TABLE %(table)s DROP COLUMN %(column)s CASCADE"
    }

    fn sql_alter_column_type(&self) -> &'static str {
        "ALTER TABLE %(table)s ALTER COLUMN %(column)s TYPE %(type)s"
    }

    fn sql_create_check(&self) -> &'static str {
        "ALTER TABLE %(table)s ADD CONSTRAINT %(name)s CHECK (%(check)s)"
    }

    /// Renders a literal for inlining into DDL (defaults and the like).
    fn quote_value(&self, value: &serde_json::Value) -> String;

    fn create_table_sql(
        &self,
        ops: &dyn DatabaseOperations,
        table: &str,
        columns: &[(&str, &str)],
    ) -> Result<String, Error> {
        let definition = columns
            .iter()
            .map(|(name, definition)| format!("{} {}", ops.quote_name(name), definition))
            .collect::<Vec<_>>()
            .join(", ");

        interpolate(
            self.sql_create_table(),
            &[
                ("table", ops.quote_name(table).as_str()),
                ("definition", definition.as_str()),
            ],
        )
    }

    fn rename_table_sql(
        &self,
        ops: &dyn DatabaseOperations,
        old_table: &str,
        new_table: &str,
    ) -> Result<String, Error> {
        interpolate(
            self.sql_rename_table(),
            &[
                ("old_table", ops.quote_name(old_table).as_str()),
                ("new_table", ops.quote_name(new_table).as_str()),
            ],
        )
    }

    fn delete_table_sql(&self, ops: &dyn DatabaseOperations, table: &str) -> Result<String, Error> {
        interpolate(
            self.sql_delete_table(),
            &[("table", ops.quote_name(table).as_str())],
        )
    }

    fn add_column_sql(
        &self,
        ops: &dyn DatabaseOperations,
        table: &str,
        column: &str,
        definition: &str,
    ) -> Result<String, Error> {
        interpolate(
            self.sql_create_column(),
            &[
                ("table", ops.quote_name(table).as_str()),
                ("column", ops.quote_name(column).as_str()),
                ("definition", definition),
            ],
        )
    }

    fn delete_column_sql(
        &self,
        ops: &dyn DatabaseOperations,
        table: &str,
        column: &str,
    ) -> Result<String, Error> {
        interpolate(
            self.sql_delete_column(),
            &[
                ("table", ops.quote_name(table).as_str()),
                ("column", ops.quote_name(column).as_str()),
            ],
        )
    }

    fn alter_column_type_sql(
        &self,
        ops: &dyn DatabaseOperations,
        table: &str,
        column: &str,
        new_type: &str,
    ) -> Result<String, Error> {
        interpolate(
            self.sql_alter_column_type(),
            &[
                ("table", ops.quote_name(table).as_str()),
                ("column", ops.quote_name(column).as_str()),
                ("type", new_type),
            ],
        )
    }

    fn create_check_sql(
        &self,
        ops: &dyn DatabaseOperations,
        table: &str,
        name: &str,
        check: &str,
    ) -> Result<String, Error> {
        interpolate(
            self.sql_create_check(),
            &[
                ("table", ops.quote_name(table).as_str()),
                ("name", ops.quote_name(name).as_str()),
                ("check", check),
            ],
        )
    }
}
