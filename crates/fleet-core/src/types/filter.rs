//! Filter types for dynamic query building.
//!
//! A filter is evaluated either by translating it to SQL or, for stores
//! without a query engine, by [`FilterField::matches`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// SQL `LIKE` pattern match.
    Like,
    /// SQL `ILIKE` case-insensitive pattern match.
    ILike,
    /// SQL `IN` list membership.
    In,
    /// SQL `IS NULL` check.
    IsNull,
    /// SQL `IS NOT NULL` check.
    IsNotNull,
}

/// A dynamic filter value that can represent various SQL types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for `IN` operator).
    StringList(Vec<String>),
    /// Null / no value (for `IS NULL`, `IS NOT NULL`).
    Null,
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for a case-insensitive LIKE filter.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::ILike, FilterValue::String(pattern.into()))
    }

    /// Case-insensitive substring match, with LIKE metacharacters escaped.
    pub fn contains(field: impl Into<String>, needle: &str) -> Self {
        Self::ilike(field, format!("%{}%", escape_like(needle)))
    }

    /// Evaluate this condition against a field value read from a record.
    ///
    /// `None` means the record has no such field and never matches.
    pub fn matches(&self, actual: Option<&FilterValue>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self.op {
            FilterOp::IsNull => *actual == FilterValue::Null,
            FilterOp::IsNotNull => *actual != FilterValue::Null,
            FilterOp::Eq => compare(actual, &self.value) == Some(Ordering::Equal),
            FilterOp::Ne => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Greater)
            ),
            FilterOp::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            FilterOp::Lte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::Like | FilterOp::ILike => match (actual, &self.value) {
                (FilterValue::String(text), FilterValue::String(pattern)) => {
                    if self.op == FilterOp::ILike {
                        like_match(&text.to_lowercase(), &pattern.to_lowercase())
                    } else {
                        like_match(text, pattern)
                    }
                }
                _ => false,
            },
            FilterOp::In => match (actual, &self.value) {
                (FilterValue::String(text), FilterValue::StringList(list)) => {
                    list.iter().any(|candidate| candidate == text)
                }
                (FilterValue::Integer(n), FilterValue::StringList(list)) => {
                    list.iter().any(|candidate| candidate.parse::<i64>().ok() == Some(*n))
                }
                _ => false,
            },
        }
    }
}

fn compare(actual: &FilterValue, expected: &FilterValue) -> Option<Ordering> {
    match (actual, expected) {
        (FilterValue::String(a), FilterValue::String(b)) => Some(a.cmp(b)),
        (FilterValue::Integer(a), FilterValue::Integer(b)) => Some(a.cmp(b)),
        (FilterValue::Integer(a), FilterValue::String(b)) => b.parse::<i64>().ok().map(|b| a.cmp(&b)),
        (FilterValue::Boolean(a), FilterValue::Boolean(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Escape `%`, `_` and `\` so the text matches literally inside a LIKE pattern.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SQL LIKE semantics: `%` matches any run, `_` one character, `\` escapes.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern = tokenize(pattern);

    // Classic wildcard matching with backtracking to the last `%`.
    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some(Token::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            Some(Token::AnyRun) => {
                star = Some((p, t));
                p += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|token| *token == Token::AnyRun)
}

#[derive(Debug, PartialEq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => tokens.push(Token::Literal(chars.next().unwrap_or('\\'))),
            '%' => tokens.push(Token::AnyRun),
            '_' => tokens.push(Token::AnyOne),
            other => tokens.push(Token::Literal(other)),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FilterValue {
        FilterValue::String(s.to_string())
    }

    #[test]
    fn test_like_wildcards() {
        assert!(like_match("honda civic", "%civic"));
        assert!(like_match("honda civic", "honda%"));
        assert!(like_match("honda civic", "%nda c%"));
        assert!(like_match("abc", "a_c"));
        assert!(!like_match("abc", "a_d"));
        assert!(like_match("", "%"));
        assert!(!like_match("abc", ""));
    }

    #[test]
    fn test_contains_escapes_metacharacters() {
        let filter = FilterField::contains("email", "a_b");
        assert!(filter.matches(Some(&text("xx a_b yy"))));
        assert!(!filter.matches(Some(&text("xx acb yy"))));
    }

    #[test]
    fn test_ilike_ignores_case() {
        let filter = FilterField::contains("marca", "HON");
        assert!(filter.matches(Some(&text("Honda"))));
    }

    #[test]
    fn test_integer_comparisons() {
        let filter = FilterField::new("ano", FilterOp::Gte, FilterValue::Integer(2000));
        assert!(filter.matches(Some(&FilterValue::Integer(2020))));
        assert!(!filter.matches(Some(&FilterValue::Integer(1999))));
        assert!(!filter.matches(Some(&text("2020"))));
    }

    #[test]
    fn test_missing_field_never_matches() {
        assert!(!FilterField::eq("nope", "x").matches(None));
    }

    #[test]
    fn test_in_list() {
        let filter = FilterField::new(
            "id",
            FilterOp::In,
            FilterValue::StringList(vec!["1".into(), "3".into()]),
        );
        assert!(filter.matches(Some(&FilterValue::Integer(3))));
        assert!(!filter.matches(Some(&FilterValue::Integer(2))));
    }
}
