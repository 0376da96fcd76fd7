use crate::backend::{DatabaseIntrospection, TableInfo, TableKind};
use crate::driver::DriverCursor;
use crate::error::Error;
use crate::snowflake::SnowflakeType;

const TABLE_LIST_SQL: &str = "SELECT table_name, table_type \
     FROM information_schema.tables \
     WHERE table_schema = CURRENT_SCHEMA() \
     ORDER BY table_name";

#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeIntrospection;

impl DatabaseIntrospection for SnowflakeIntrospection {
    /// Snowflake reports unquoted identifiers in upper case.
    fn identifier_converter(&self, name: &str) -> String {
        name.to_lowercase()
    }

    fn get_field_type(&self, data_type: &str) -> Option<&'static str> {
        let ty = SnowflakeType::from_name(data_type)?;

        // NUMBER(p, 0) is how every integer column is reported
        if ty == SnowflakeType::Number && number_scale(data_type) == Some(0) {
            return Some("BigIntegerField");
        }

        ty.field_kind()
    }

    fn get_table_list(&self, cursor: &mut dyn DriverCursor) -> Result<Vec<TableInfo>, Error> {
        cursor.execute(TABLE_LIST_SQL, &[])?;

        let tables = cursor
            .fetchall()?
            .into_iter()
            .filter_map(|row| {
                let mut columns = row.into_iter();
                let name = columns.next()?;
                let kind = match columns.next() {
                    Some(serde_json::Value::String(kind)) if kind == "VIEW" => TableKind::View,
                    _ => TableKind::Table,
                };

                Some(TableInfo {
                    name: self.identifier_converter(name.as_str()?),
                    kind,
                })
            })
            .collect();

        Ok(tables)
    }
}

fn number_scale(data_type: &str) -> Option<u32> {
    let (_, args) = data_type.split_once('(')?;
    let (_, scale) = args.trim_end_matches(')').split_once(',')?;
    scale.trim().parse().ok()
}
