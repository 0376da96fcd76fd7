use crate::backend::DatabaseOperations;
use crate::snowflake::tables::{OPERATORS, PATTERN_ESC, PATTERN_OPS};

const PATTERN_LOOKUPS: [&str; 9] = [
    "iexact",
    "contains",
    "icontains",
    "startswith",
    "istartswith",
    "endswith",
    "iendswith",
    "regex",
    "iregex",
];

const CASE_INSENSITIVE_LOOKUPS: [&str; 4] = ["iexact", "icontains", "istartswith", "iendswith"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeOperations;

impl SnowflakeOperations {
    /// Right-hand side SQL for a lookup against a bound parameter.
    pub fn operator_sql(&self, lookup_type: &str) -> Option<&'static str> {
        OPERATORS.get(lookup_type).copied()
    }

    /// Right-hand side SQL for a pattern lookup against the expression `rhs`,
    /// with the expression's wildcards escaped.
    pub fn pattern_sql(&self, lookup_type: &str, rhs: &str) -> Option<String> {
        let escaped = PATTERN_ESC.replacen("{}", rhs, 1);

        PATTERN_OPS
            .get(lookup_type)
            .map(|template| template.replacen("{}", &escaped, 1))
    }
}

impl DatabaseOperations for SnowflakeOperations {
    fn quote_name(&self, name: &str) -> String {
        if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
            return name.to_owned();
        }

        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn max_name_length(&self) -> Option<usize> {
        Some(255)
    }

    fn lookup_cast(&self, lookup_type: &str, internal_type: &str) -> String {
        let mut lookup = "%s".to_owned();

        if PATTERN_LOOKUPS.contains(&lookup_type)
            && !matches!(internal_type, "CharField" | "TextField")
        {
            lookup = format!("TO_VARCHAR({})", lookup);
        }

        if CASE_INSENSITIVE_LOOKUPS.contains(&lookup_type) {
            lookup = format!("UPPER({})", lookup);
        }

        lookup
    }

    fn sql_flush(&self, tables: &[&str], _reset_sequences: bool) -> Vec<String> {
        tables
            .iter()
            .map(|table| format!("TRUNCATE TABLE {}", self.quote_name(table)))
            .collect()
    }

    fn set_time_zone_sql(&self) -> Option<&'static str> {
        Some("ALTER SESSION SET TIMEZONE = %s")
    }
}
