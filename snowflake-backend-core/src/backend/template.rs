use indexmap::IndexMap;

use crate::error::Error;

/// A static table of SQL templates keyed by field kind or lookup name.
pub type TemplateMap = IndexMap<&'static str, &'static str>;

/// Renders `%(name)s` placeholders from `params`; `%%` becomes `%`.
///
/// Any other `%` sequence (such as a bare `%s` bind marker) is copied through.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(tail) = rest.strip_prefix("%%") {
            out.push('%');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%(") {
            let end = tail
                .find(")s")
                .ok_or_else(|| Error::Template(tail.to_owned()))?;
            let key = &tail[..end];
            let value = params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| *value)
                .ok_or_else(|| Error::Template(key.to_owned()))?;

            out.push_str(value);
            rest = &tail[end + 2..];
        } else {
            out.push('%');
            rest = &rest[1..];
        }
    }

    out.push_str(rest);

    Ok(out)
}
