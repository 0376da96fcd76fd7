use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::backend::TemplateMap;

pub(crate) static DATA_TYPES: Lazy<TemplateMap> = Lazy::new(|| {
    IndexMap::from([
        ("AutoField", "serial"),
        ("BigAutoField", "bigserial"),
        ("BinaryField", "bytea"),
        ("BooleanField", "boolean"),
        ("CharField", "varchar(%(max_length)s)"),
        ("DateField", "date"),
        ("DateTimeField", "timestamp with time zone"),
        ("DecimalField", "numeric(%(max_digits)s, %(decimal_places)s)"),
        ("DurationField", "interval"),
        ("FileField", "varchar(%(max_length)s)"),
        ("FilePathField", "varchar(%(max_length)s)"),
        ("FloatField", "double precision"),
        ("IntegerField", "integer"),
        ("BigIntegerField", "bigint"),
        ("IPAddressField", "inet"),
        ("GenericIPAddressField", "inet"),
        ("JSONField", "jsonb"),
        ("NullBooleanField", "boolean"),
        ("OneToOneField", "integer"),
        ("PositiveBigIntegerField", "bigint"),
        ("PositiveIntegerField", "integer"),
        ("PositiveSmallIntegerField", "smallint"),
        ("SlugField", "varchar(%(max_length)s)"),
        ("SmallAutoField", "smallserial"),
        ("SmallIntegerField", "smallint"),
        ("TextField", "text"),
        ("TimeField", "time"),
        ("UUIDField", "uuid"),
    ])
});

pub(crate) static DATA_TYPE_CHECK_CONSTRAINTS: Lazy<TemplateMap> = Lazy::new(|| {
    IndexMap::from([
        ("PositiveBigIntegerField", r#""%(column)s" >= 0"#),
        ("PositiveIntegerField", r#""%(column)s" >= 0"#),
        ("PositiveSmallIntegerField", r#""%(column)s" >= 0"#),
    ])
});

pub(crate) static OPERATORS: Lazy<TemplateMap> = Lazy::new(|| {
    IndexMap::from([
        ("exact", "= %s"),
        ("iexact", "= UPPER(%s)"),
        ("contains", "LIKE %s"),
        ("icontains", "LIKE UPPER(%s)"),
        ("regex", "~ %s"),
        ("iregex", "~* %s"),
        ("gt", "> %s"),
        ("gte", ">= %s"),
        ("lt", "< %s"),
        ("lte", "<= %s"),
        ("startswith", "LIKE %s"),
        ("endswith", "LIKE %s"),
        ("istartswith", "LIKE UPPER(%s)"),
        ("iendswith", "LIKE UPPER(%s)"),
    ])
});

pub(crate) const PATTERN_ESC: &str =
    r"REPLACE(REPLACE(REPLACE({}, E'\\', E'\\\\'), E'%%', E'\\%%'), E'_', E'\\_')";

pub(crate) static PATTERN_OPS: Lazy<TemplateMap> = Lazy::new(|| {
    IndexMap::from([
        ("contains", "LIKE '%%' || {} || '%%'"),
        ("icontains", "LIKE '%%' || UPPER({}) || '%%'"),
        ("startswith", "LIKE {} || '%%'"),
        ("istartswith", "LIKE UPPER({}) || '%%'"),
        ("endswith", "LIKE '%%' || {}"),
        ("iendswith", "LIKE '%%' || UPPER({})"),
    ])
});
