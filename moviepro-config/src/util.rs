use std::str::FromStr;

/// Parse a trimmed numeric value, ignoring anything that does not parse.
pub fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Strip every trailing slash so path segments can be joined with `/`.
pub fn trim_trailing_slash(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}
