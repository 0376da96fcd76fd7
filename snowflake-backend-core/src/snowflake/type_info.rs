use std::fmt::{self, Display};

/// Snowflake column types, with synonyms folded into the type they name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SnowflakeType {
    Number,
    Int,
    Bigint,
    Smallint,
    Float,
    Varchar,
    Text,
    Binary,
    Boolean,
    Date,
    Time,
    TimestampNtz,
    TimestampLtz,
    TimestampTz,
    Variant,
    Object,
    Array,
    Geography,
    Geometry,
}

// every spelling Snowflake accepts in DDL or reports in information_schema
const NAMES: &[(&str, SnowflakeType)] = &[
    ("NUMBER", SnowflakeType::Number),
    ("DECIMAL", SnowflakeType::Number),
    ("NUMERIC", SnowflakeType::Number),
    ("INT", SnowflakeType::Int),
    ("INTEGER", SnowflakeType::Int),
    ("BIGINT", SnowflakeType::Bigint),
    ("SMALLINT", SnowflakeType::Smallint),
    ("TINYINT", SnowflakeType::Smallint),
    ("BYTEINT", SnowflakeType::Smallint),
    ("FLOAT", SnowflakeType::Float),
    ("FLOAT4", SnowflakeType::Float),
    ("FLOAT8", SnowflakeType::Float),
    ("DOUBLE", SnowflakeType::Float),
    ("DOUBLE PRECISION", SnowflakeType::Float),
    ("REAL", SnowflakeType::Float),
    ("VARCHAR", SnowflakeType::Varchar),
    ("CHAR", SnowflakeType::Varchar),
    ("CHARACTER", SnowflakeType::Varchar),
    ("STRING", SnowflakeType::Varchar),
    ("TEXT", SnowflakeType::Text),
    ("BINARY", SnowflakeType::Binary),
    ("VARBINARY", SnowflakeType::Binary),
    ("BOOLEAN", SnowflakeType::Boolean),
    ("DATE", SnowflakeType::Date),
    ("TIME", SnowflakeType::Time),
    ("TIMESTAMP_NTZ", SnowflakeType::TimestampNtz),
    ("DATETIME", SnowflakeType::TimestampNtz),
    ("TIMESTAMP", SnowflakeType::TimestampNtz),
    ("TIMESTAMP_LTZ", SnowflakeType::TimestampLtz),
    ("TIMESTAMP_TZ", SnowflakeType::TimestampTz),
    ("VARIANT", SnowflakeType::Variant),
    ("OBJECT", SnowflakeType::Object),
    ("ARRAY", SnowflakeType::Array),
    ("GEOGRAPHY", SnowflakeType::Geography),
    ("GEOMETRY", SnowflakeType::Geometry),
];

impl SnowflakeType {
    /// Canonical type name.
    pub fn name(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, ty)| ty == self)
            .map(|(name, _)| *name)
            .unwrap_or("VARIANT")
    }

    /// Parses a type name, ignoring case and any `(precision, scale)` suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        let base = name.split('(').next().unwrap_or(name).trim();

        NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(base))
            .map(|(_, ty)| *ty)
    }

    /// The host field kind used when introspecting a column of this type.
    pub fn field_kind(&self) -> Option<&'static str> {
        Some(match self {
            SnowflakeType::Number => "DecimalField",
            SnowflakeType::Int => "IntegerField",
            SnowflakeType::Bigint => "BigIntegerField",
            SnowflakeType::Smallint => "SmallIntegerField",
            SnowflakeType::Float => "FloatField",
            SnowflakeType::Varchar => "CharField",
            SnowflakeType::Text => "TextField",
            SnowflakeType::Binary => "BinaryField",
            SnowflakeType::Boolean => "BooleanField",
            SnowflakeType::Date => "DateField",
            SnowflakeType::Time => "TimeField",
            SnowflakeType::TimestampNtz
            | SnowflakeType::TimestampLtz
            | SnowflakeType::TimestampTz => "DateTimeField",
            SnowflakeType::Variant | SnowflakeType::Object | SnowflakeType::Array => "JSONField",
            SnowflakeType::Geography | SnowflakeType::Geometry => return None,
        })
    }
}

impl Display for SnowflakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
