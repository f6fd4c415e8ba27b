//! Parse results and the failure-merge algebra.
//!
//! Every parser invocation, primitive or combinator, returns a
//! [`ParseResult`]. Combinators compose child results exclusively through
//! [`ParseResult::merge`], which is what makes error reporting work under
//! backtracking: the furthest failure wins, and failures at the same
//! offset pool their expectations.

use std::fmt;

use crate::value::Value;

/// The outcome of running one parser against `(text, start)`.
///
/// On `Success`, `index` is the position after the last consumed byte and
/// `value` is the parsed artifact. A success may consume nothing
/// (`index == start`).
///
/// On `Failure`, `index` is the furthest position at which a match was
/// attempted and refused, which is not necessarily where the parser
/// started. `expectations` lists what would have been accepted there, in
/// the order the failing parsers were tried. Duplicates are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    Success { index: usize, value: Value },
    Failure { index: usize, expectations: Vec<String> },
}

impl ParseResult {
    pub fn success(index: usize, value: Value) -> Self {
        ParseResult::Success { index, value }
    }

    pub fn failure(index: usize, expectation: impl Into<String>) -> Self {
        ParseResult::Failure {
            index,
            expectations: vec![expectation.into()],
        }
    }

    /// A failure carrying no expectations yet. Used as the fold seed of an
    /// alternative and for purely structural failures.
    pub fn bare_failure(index: usize) -> Self {
        ParseResult::Failure {
            index,
            expectations: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success { .. })
    }

    pub fn index(&self) -> usize {
        match self {
            ParseResult::Success { index, .. } | ParseResult::Failure { index, .. } => *index,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ParseResult::Success { value, .. } => Some(value),
            ParseResult::Failure { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            ParseResult::Success { value, .. } => Some(value),
            ParseResult::Failure { .. } => None,
        }
    }

    /// The expectation set of a failure. Empty on success.
    pub fn expectations(&self) -> &[String] {
        match self {
            ParseResult::Success { .. } => &[],
            ParseResult::Failure { expectations, .. } => expectations,
        }
    }

    /// Fold a child result into this one.
    ///
    /// * Both successes: the index advances to `other`'s and `other`'s
    ///   value is appended to the list being accumulated here. The value
    ///   of `self` must be a `Value::List`; this is how `sequence` and the
    ///   repetition combinators collect child values.
    /// * Both failures: a further failure supersedes this one entirely; a
    ///   failure at the same offset contributes its expectations; a nearer
    ///   failure is discarded.
    /// * Differing status: `other` overwrites `self`.
    ///
    /// # Panics
    ///
    /// Panics when merging a success into a success whose value is not a
    /// list.
    pub fn merge(&mut self, other: ParseResult) {
        if self.is_success() != other.is_success() {
            *self = other;
            return;
        }
        match (self, other) {
            (
                ParseResult::Success { index, value },
                ParseResult::Success {
                    index: advanced,
                    value: produced,
                },
            ) => {
                *index = advanced;
                match value {
                    Value::List(items) => items.push(produced),
                    _ => panic!("merge target value must be a list"),
                }
            }
            (
                ParseResult::Failure {
                    index,
                    expectations,
                },
                ParseResult::Failure {
                    index: further,
                    expectations: expected,
                },
            ) => {
                if further > *index {
                    *index = further;
                    *expectations = expected;
                } else if further == *index {
                    expectations.extend(expected);
                }
            }
            _ => unreachable!("status mismatch handled above"),
        }
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseResult::Success { index, .. } => write!(f, "success at offset {}", index),
            ParseResult::Failure {
                index,
                expectations,
            } => {
                if expectations.is_empty() {
                    write!(f, "parse error at offset {}", index)
                } else {
                    write!(
                        f,
                        "parse error at offset {}: expected {}",
                        index,
                        expectations.join(" OR ")
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_success_appends_and_advances() {
        let mut result = ParseResult::success(0, Value::List(vec![]));
        result.merge(ParseResult::success(3, Value::string("abc")));
        result.merge(ParseResult::success(5, Value::string("de")));
        assert_eq!(
            result,
            ParseResult::success(
                5,
                Value::List(vec![Value::string("abc"), Value::string("de")])
            )
        );
    }

    #[test]
    fn test_merge_further_failure_supersedes() {
        let mut result = ParseResult::failure(2, "a");
        result.merge(ParseResult::failure(5, "b"));
        assert_eq!(result, ParseResult::failure(5, "b"));
    }

    #[test]
    fn test_merge_same_offset_unions_expectations() {
        let mut result = ParseResult::failure(2, "a");
        result.merge(ParseResult::failure(2, "b"));
        result.merge(ParseResult::failure(2, "a"));
        assert_eq!(
            result.expectations(),
            ["a".to_string(), "b".to_string(), "a".to_string()]
        );
        assert_eq!(result.index(), 2);
    }

    #[test]
    fn test_merge_discards_nearer_failure() {
        let mut result = ParseResult::failure(4, "far");
        result.merge(ParseResult::failure(1, "near"));
        assert_eq!(result, ParseResult::failure(4, "far"));
    }

    #[test]
    fn test_merge_overwrites_on_status_change() {
        let mut result = ParseResult::success(3, Value::List(vec![Value::Unit]));
        result.merge(ParseResult::failure(3, "x"));
        assert_eq!(result, ParseResult::failure(3, "x"));

        let mut result = ParseResult::bare_failure(0);
        result.merge(ParseResult::success(2, Value::string("ok")));
        assert_eq!(result, ParseResult::success(2, Value::string("ok")));
    }

    #[test]
    fn test_expectations_empty_on_success() {
        let result = ParseResult::success(1, Value::Unit);
        assert!(result.expectations().is_empty());
        assert_eq!(result.value(), Some(&Value::Unit));
    }

    #[test]
    fn test_display_joins_expectations() {
        let mut result = ParseResult::failure(0, "\"");
        result.merge(ParseResult::failure(0, r"\w+"));
        assert_eq!(
            result.to_string(),
            "parse error at offset 0: expected \" OR \\w+"
        );
    }

    #[test]
    fn test_display_structural_failure() {
        assert_eq!(
            ParseResult::bare_failure(7).to_string(),
            "parse error at offset 7"
        );
    }
}
