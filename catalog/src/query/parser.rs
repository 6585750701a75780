//! Tokenizer for filter expressions: clauses, connectives and operators.

use std::fmt;

use serde::Serialize;

use super::error::QueryError;

/// A single `entity.field:content` clause, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause<'a> {
    pub entity: &'a str,
    pub field: &'a str,
    pub content: &'a str,
}

/// Logical connective joining two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    And,
    Or,
}

/// Operator prefixing a clause's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `NOT value`
    Not,
    /// `< value`
    Lt,
    /// `> value`
    Gt,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// Parse a clause at the first `.` and the first `:` after it.
pub fn parse_clause(input: &str) -> Result<Clause<'_>, QueryError> {
    let (entity, rest) = input
        .split_once('.')
        .ok_or_else(|| QueryError::Malformed(format!("missing '.' in '{}'", input.trim())))?;
    let (field, content) = rest
        .split_once(':')
        .ok_or_else(|| QueryError::Malformed(format!("missing ':' in '{}'", input.trim())))?;

    Ok(Clause {
        entity: entity.trim(),
        field: field.trim(),
        content: content.trim(),
    })
}

/// Split an expression at its connective, if it has one.
///
/// Returns `Ok(None)` for a single clause. More than one connective is
/// rejected since the language has no grouping.
pub fn split_connective(input: &str) -> Result<Option<(Connective, &str, &str)>, QueryError> {
    let found = scan_connectives(input);

    match found.as_slice() {
        [] => Ok(None),
        [(pos, connective)] => {
            let left = &input[..*pos];
            let right = &input[*pos + connective.as_str().len()..];
            Ok(Some((*connective, left.trim(), right.trim())))
        }
        _ => Err(QueryError::Malformed(format!(
            "expected at most one AND/OR, found {}",
            found.len()
        ))),
    }
}

/// Byte offsets of whole-word connectives outside quoted values.
///
/// Only a quote opening a clause's content (after an optional operator)
/// starts a quoted value; any other `"` is an ordinary character.
fn scan_connectives(input: &str) -> Vec<(usize, Connective)> {
    let mut found = Vec::new();
    let mut quoted_end: Option<usize> = None;
    let mut in_content = false;
    let mut at_word_start = true;

    for (pos, c) in input.char_indices() {
        match quoted_end {
            Some(end) if pos < end => continue,
            Some(_) => {
                quoted_end = None;
                at_word_start = false;
                continue;
            }
            None => {}
        }

        if c == ':' && !in_content {
            in_content = true;
            quoted_end = quoted_value_end(input, pos + 1);
        } else if at_word_start {
            let rest = &input[pos..];
            for connective in [Connective::And, Connective::Or] {
                if let Some(after) = rest.strip_prefix(connective.as_str()) {
                    if after.chars().next().map_or(true, char::is_whitespace) {
                        found.push((pos, connective));
                        in_content = false;
                    }
                }
            }
        }
        at_word_start = c.is_whitespace();
    }

    found
}

/// Offset of the closing quote when the content starting at `start` is a
/// quoted value. The closing quote must end a word.
fn quoted_value_end(input: &str, start: usize) -> Option<usize> {
    let content = input[start..].trim_start();
    let value = match content.strip_prefix("NOT") {
        Some(after) if after.starts_with(char::is_whitespace) => after,
        _ => content.strip_prefix(&['<', '>'][..]).unwrap_or(content),
    };
    let inner = value.trim_start().strip_prefix('"')?;
    let base = input.len() - inner.len();

    inner
        .char_indices()
        .find(|&(i, c)| {
            c == '"' && inner[i + 1..].chars().next().map_or(true, char::is_whitespace)
        })
        .map(|(i, _)| base + i)
}

/// Split the leading operator off a clause's content.
///
/// Operators are tried in priority order `NOT`, `<`, `>`. `NOT` must stand
/// alone as a word; `<` and `>` may touch their value.
pub fn split_operator(content: &str) -> (Option<Operator>, &str) {
    let content = content.trim();

    if let Some(rest) = content.strip_prefix("NOT") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return (Some(Operator::Not), rest.trim());
        }
    }
    if let Some(rest) = content.strip_prefix('<') {
        return (Some(Operator::Lt), rest.trim());
    }
    if let Some(rest) = content.strip_prefix('>') {
        return (Some(Operator::Gt), rest.trim());
    }

    (None, content)
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Not => write!(f, "NOT"),
            Operator::Lt => write!(f, "<"),
            Operator::Gt => write!(f, ">"),
        }
    }
}
