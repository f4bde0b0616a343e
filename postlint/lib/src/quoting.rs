//! Quoting state of frontmatter values.

use serde::{Deserialize, Serialize};

const DOUBLE: char = '"';
const SINGLE: char = '\'';

/// How a value is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    Unquoted,
    Double,
    Single,
}

impl Quoting {
    /// A value is quoted iff its first and last characters are the same
    /// quote character and it is at least two characters long.
    pub fn of(value: &str) -> Self {
        if value.len() < 2 {
            return Self::Unquoted;
        }
        if value.starts_with(DOUBLE) && value.ends_with(DOUBLE) {
            Self::Double
        } else if value.starts_with(SINGLE) && value.ends_with(SINGLE) {
            Self::Single
        } else {
            Self::Unquoted
        }
    }
}

pub fn is_quoted(value: &str) -> bool {
    Quoting::of(value) != Quoting::Unquoted
}

/// Whether the value begins with a quote character.
pub fn opens_quote(value: &str) -> bool {
    value.starts_with(DOUBLE) || value.starts_with(SINGLE)
}

/// Strips one matching pair of surrounding quotes.
pub fn unquote(value: &str) -> &str {
    match Quoting::of(value) {
        Quoting::Unquoted => value,
        // Both quote characters are one byte wide.
        Quoting::Double | Quoting::Single => &value[1..value.len() - 1],
    }
}

/// Wraps `value` in double quotes, escaping `\` and `"` for a YAML
/// double-quoted scalar.
pub fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(DOUBLE);
    for c in value.chars() {
        if c == '\\' || c == DOUBLE {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(DOUBLE);
    out
}
