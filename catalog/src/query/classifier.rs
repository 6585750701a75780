//! Content classification against a field's kind.

use crate::schema::FieldKind;

/// Result of checking a value against a field kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// The value does not fit the field's kind.
    Invalid,
    /// An unquoted numeric value usable with `<` and `>`.
    Comparable(f64),
    /// Valid, but only usable for matching.
    ExactOnly,
}

impl Classification {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Classification::Invalid)
    }
}

/// Strip one enclosing pair of double quotes.
///
/// Returns the inner text and whether quotes were removed. A lone `"` is not
/// a pair.
pub fn strip_quotes(value: &str) -> (&str, bool) {
    match value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => (inner, true),
        None => (value, false),
    }
}

/// Classify a value for a field of the given kind.
///
/// Quoting keeps the type check but disables comparison, so `"42"` on an
/// integer field is valid and exact-only.
pub fn classify(kind: FieldKind, content: &str) -> Classification {
    let content = content.trim();
    if content.is_empty() {
        return Classification::ExactOnly;
    }

    let (inner, quoted) = strip_quotes(content);

    let number = match kind {
        FieldKind::Text => return Classification::ExactOnly,
        FieldKind::Integer => {
            if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
                return Classification::Invalid;
            }
            inner.parse::<f64>().ok()
        }
        FieldKind::Float => match inner.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => return Classification::Invalid,
        },
    };

    match number {
        Some(n) if !quoted => Classification::Comparable(n),
        _ => Classification::ExactOnly,
    }
}
