//! Literal handling for KG object strings.
//!
//! Source-KG literals arrive as raw strings in several shapes:
//! - typed literals: `"+12.5"^^<http://www.w3.org/2001/XMLSchema#decimal>`
//! - quoted date-times: `"2001-01-01T00:00:00Z"^^<xsd:dateTime>`
//! - bare quoted or unquoted numbers
//!
//! None of these are schema-guaranteed well-formed, so parsing is strict and
//! total: a malformed numeric literal is a [`NotNumeric`] outcome, never a
//! panic, and callers treat it as "no usable value here".

use thiserror::Error;

/// Full IRI of the decimal literal datatype; used as a substring filter when
/// restricting a traversal to numeric-valued objects.
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a numeric literal: {0:?}")]
pub struct NotNumeric(pub String);

/// Strictly parse the numeric value of a KG object string.
///
/// Accepts a quoted lexical form (with or without a datatype suffix) or a
/// bare number; a leading `+` sign is tolerated. Anything else is an explicit
/// [`NotNumeric`].
pub fn parse_numeric_literal(raw: &str) -> Result<f64, NotNumeric> {
    let lexical = match quoted_portion(raw) {
        Some(inner) => inner,
        None => raw.trim(),
    };
    let lexical = lexical.strip_prefix('+').unwrap_or(lexical);
    lexical
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| NotNumeric(raw.to_string()))
}

/// Reduce a typed or quoted literal to its plain lexical form, for surfacing
/// as an answer. Entity ids and already-plain strings pass through unchanged.
pub fn normalize_literal(raw: &str) -> String {
    if let Some(inner) = quoted_portion(raw) {
        let suffix = &raw[raw.rfind('"').map(|i| i + 1).unwrap_or(raw.len())..];
        if suffix.contains("dateTime") {
            return inner.trim_end_matches("T00:00:00Z").to_string();
        }
        if suffix.contains("decimal") {
            return inner.trim_start_matches('+').to_string();
        }
        return inner.to_string();
    }
    raw.to_string()
}

/// The text between the first and last double quote, if the string carries a
/// quoted lexical form.
fn quoted_portion(raw: &str) -> Option<&str> {
    let start = raw.find('"')?;
    let end = raw.rfind('"')?;
    if end > start {
        Some(&raw[start + 1..end])
    } else {
        None
    }
}
