use crate::error::Error;

/// Backend-specific SQL snippets used by the host's compiler.
pub trait DatabaseOperations {
    /// Quotes an identifier. Quoting an already quoted name returns it unchanged.
    fn quote_name(&self, name: &str) -> String;

    fn max_name_length(&self) -> Option<usize> {
        None
    }

    /// Cast applied to the left-hand side of a lookup, as a `%s` template.
    fn lookup_cast(&self, _lookup_type: &str, _internal_type: &str) -> String {
        "%s".to_owned()
    }

    /// Escapes the `LIKE` wildcards of a literal.
    fn prep_for_like_query(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for ch in value.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped
    }

    /// Statements that empty `tables`.
    fn sql_flush(&self, tables: &[&str], reset_sequences: bool) -> Vec<String>;

    fn set_time_zone_sql(&self) -> Option<&'static str> {
        None
    }

    /// Best-effort rendering of a statement with its parameters, for error messages.
    fn last_executed_query(&self, sql: &str, params: &[serde_json::Value]) -> String {
        if params.is_empty() {
            return sql.to_owned();
        }

        format!(
            "{} -- params: {}",
            sql,
            serde_json::to_string(params).unwrap_or_default()
        )
    }

    /// Checks a name against [`max_name_length`][Self::max_name_length].
    fn check_name_length(&self, name: &str) -> Result<(), Error> {
        match self.max_name_length() {
            Some(max) if name.chars().count() > max => Err(Error::Configuration(
                format!(
                    "the identifier `{}` ({} characters) is longer than the limit of {} characters",
                    name,
                    name.chars().count(),
                    max
                )
                .into(),
            )),
            _ => Ok(()),
        }
    }
}
