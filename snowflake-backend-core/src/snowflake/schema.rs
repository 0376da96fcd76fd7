use crate::backend::{interpolate, SchemaEditor};
use crate::error::Error;
use crate::snowflake::tables::DATA_TYPES;

#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeSchemaEditor;

impl SnowflakeSchemaEditor {
    /// Column type for `field_kind`, or `None` if the kind has no column.
    pub fn column_sql(
        &self,
        field_kind: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<String>, Error> {
        DATA_TYPES
            .get(field_kind)
            .map(|template| interpolate(template, params))
            .transpose()
    }
}

impl SchemaEditor for SnowflakeSchemaEditor {
    fn sql_alter_column_type(&self) -> &'static str {
        "ALTER TABLE %(table)s ALTER COLUMN %(column)s SET DATA TYPE %(type)s"
    }

    fn quote_value(&self, value: &serde_json::Value) -> String {
        use serde_json::Value;

        match value {
            Value::Null => "NULL".to_owned(),
            Value::Bool(true) => "TRUE".to_owned(),
            Value::Bool(false) => "FALSE".to_owned(),
            Value::Number(number) => number.to_string(),
            Value::String(text) => quote_string(text),
            Value::Array(_) | Value::Object(_) => {
                format!("PARSE_JSON({})", quote_string(&value.to_string()))
            }
        }
    }
}

fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snowflake::SnowflakeOperations;
    use serde_json::json;

    #[test]
    fn it_renders_column_types() {
        let editor = SnowflakeSchemaEditor;
        assert_eq!(
            editor
                .column_sql("DecimalField", &[("max_digits", "12"), ("decimal_places", "2")])
                .unwrap()
                .as_deref(),
            Some("numeric(12, 2)")
        );
        assert_eq!(editor.column_sql("ForeignObject", &[]).unwrap(), None);
        assert!(editor.column_sql("CharField", &[]).is_err());
    }

    #[test]
    fn it_renders_table_statements() {
        let editor = SnowflakeSchemaEditor;
        let ops = SnowflakeOperations;

        assert_eq!(
            editor
                .create_table_sql(&ops, "author", &[("id", "integer"), ("name", "varchar(100)")])
                .unwrap(),
            r#"CREATE TABLE "author" ("id" integer, "name" varchar(100))"#
        );
        assert_eq!(
            editor.alter_column_type_sql(&ops, "author", "name", "text").unwrap(),
            r#"ALTER TABLE "author" ALTER COLUMN "name" SET DATA TYPE text"#
        );
        assert_eq!(
            editor.delete_table_sql(&ops, "author").unwrap(),
            r#"DROP TABLE "author" CASCADE"#
        );
    }

    #[test]
    fn it_quotes_literals() {
        let editor = SnowflakeSchemaEditor;
        assert_eq!(editor.quote_value(&json!("O'Brien")), "'O''Brien'");
        assert_eq!(editor.quote_value(&json!(null)), "NULL");
        assert_eq!(editor.quote_value(&json!(false)), "FALSE");
        assert_eq!(editor.quote_value(&json!({"a": 1})), r#"PARSE_JSON('{"a":1}')"#);
    }

    #[test]
    fn it_renders_column_statements() {
        let editor = SnowflakeSchemaEditor;
        let ops = SnowflakeOperations;

        assert_eq!(
            editor.rename_table_sql(&ops, "author", "writer").unwrap(),
            r#"ALTER TABLE "author" RENAME TO "writer""#
        );
        assert_eq!(
            editor.add_column_sql(&ops, "author", "bio", "text NULL").unwrap(),
            r#"ALTER TABLE "author" ADD COLUMN "bio" text NULL"#
        );
        assert_eq!(
            editor.delete_column_sql(&ops, "author", "bio").unwrap(),
            r#"ALTER TABLE "author" DROP COLUMN "bio" CASCADE"#
        );
        assert_eq!(
            editor.create_check_sql(&ops, "author", "age_gte_0", r#""age" >= 0"#).unwrap(),
            r#"ALTER TABLE "author" ADD CONSTRAINT "age_gte_0" CHECK ("age" >= 0)"#
        );
    }
}
