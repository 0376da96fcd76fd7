use crate::driver::DriverCursor;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Table,
    View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub kind: TableKind,
}

/// Reads the live schema back into the host's vocabulary.
pub trait DatabaseIntrospection {
    /// Normalizes an identifier reported by the database.
    fn identifier_converter(&self, name: &str) -> String {
        name.to_owned()
    }

    /// Field kind for a column type reported by the database.
    fn get_field_type(&self, data_type: &str) -> Option<&'static str>;

    fn get_table_list(&self, cursor: &mut dyn DriverCursor) -> Result<Vec<TableInfo>, Error>;

    /// Sorted names of every table (and optionally view).
    fn table_names(
        &self,
        cursor: &mut dyn DriverCursor,
        include_views: bool,
    ) -> Result<Vec<String>, Error> {
        let mut names: Vec<String> = self
            .get_table_list(cursor)?
            .into_iter()
            .filter(|table| include_views || table.kind == TableKind::Table)
            .map(|table| table.name)
            .collect();
        names.sort();
        Ok(names)
    }
}
