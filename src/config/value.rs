//! Typed views over config values, which are always stored as strings.

/// Interpret a config value as a boolean.
///
/// `None` is a key written without `=`, which git treats as true.
pub(crate) fn parse_bool(value: Option<&str>) -> Option<bool> {
    let value = match value {
        Some(value) => value,
        None => return Some(true),
    };

    if ["true", "yes", "on", "1"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
    {
        Some(true)
    } else if ["false", "no", "off", "0"]
        .iter()
        .any(|f| value.eq_ignore_ascii_case(f))
    {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Interpret a config value as a base-10, optionally signed, 64-bit integer.
pub(crate) fn parse_i64(value: Option<&str>) -> Option<i64> {
    value?.parse().ok()
}
