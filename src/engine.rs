//! Parse evaluation.
//!
//! Construction produces an immutable node table; this module walks it.
//! Each invocation threads `(text, start)` down and a [`ParseResult`] back
//! up. Nodes keep no state between calls, so any node can be shared
//! between positions in the graph and a finished grammar can serve
//! concurrent parses.

use crate::grammar::{Grammar, ParserId, ParserNode};
use crate::result::ParseResult;
use crate::value::Value;

impl Grammar {
    /// Run `root` against `text` from offset zero.
    pub fn parse(&self, root: ParserId, text: &str) -> ParseResult {
        self.parse_at(root, text, 0)
    }

    /// Run `root` against `text` from byte offset `start`.
    ///
    /// `start` must be at most `text.len()` and lie on a character
    /// boundary.
    pub fn parse_at(&self, root: ParserId, text: &str, start: usize) -> ParseResult {
        self.run(root, text, start)
    }

    fn run(&self, id: ParserId, text: &str, start: usize) -> ParseResult {
        match &self.nodes[id.0] {
            ParserNode::Literal {
                text: literal,
                case_sensitive,
            } => {
                let end = start + literal.len();
                let matched = text.len() >= end && {
                    let window = &text.as_bytes()[start..end];
                    if *case_sensitive {
                        window == literal.as_bytes()
                    } else {
                        window.eq_ignore_ascii_case(literal.as_bytes())
                    }
                };
                if matched {
                    ParseResult::success(end, Value::string(&text[start..end]))
                } else {
                    ParseResult::failure(start, literal.clone())
                }
            }

            ParserNode::Pattern {
                pattern,
                regex,
                group,
            } => match regex.captures(&text[start..]) {
                Some(captures) => {
                    let consumed = captures.get(0).map_or(0, |whole| whole.end());
                    let value = captures.get(*group).map_or("", |m| m.as_str());
                    ParseResult::success(start + consumed, Value::string(value))
                }
                None => ParseResult::failure(start, pattern.clone()),
            },

            ParserNode::Eof => {
                if start < text.len() {
                    ParseResult::failure(start, "EOF")
                } else {
                    ParseResult::success(start, Value::Unit)
                }
            }

            ParserNode::Forward { target } => match target {
                Some(defined) => self.run(*defined, text, start),
                None => panic!("forward parser used before Grammar::define"),
            },

            ParserNode::Sequence { children } => {
                let mut result =
                    ParseResult::success(start, Value::List(Vec::with_capacity(children.len())));
                for child in children {
                    let attempt = self.run(*child, text, result.index());
                    result.merge(attempt);
                    if !result.is_success() {
                        break;
                    }
                }
                result
            }

            ParserNode::Alternative { children } => {
                let mut result = ParseResult::bare_failure(start);
                for child in children {
                    result.merge(self.run(*child, text, start));
                    if result.is_success() {
                        break;
                    }
                }
                result
            }

            ParserNode::Map { inner, mapper } => match self.run(*inner, text, start) {
                ParseResult::Success { index, value } => {
                    ParseResult::success(index, mapper(value))
                }
                failure => failure,
            },

            ParserNode::Times { inner, min, max } => {
                let mut result = ParseResult::success(start, Value::List(Vec::new()));
                for round in 0..*max {
                    let attempt = self.run(*inner, text, result.index());
                    if !attempt.is_success() {
                        if round < *min {
                            return attempt;
                        }
                        break;
                    }
                    result.merge(attempt);
                }
                result
            }

            ParserNode::Many { inner } => {
                let mut result = ParseResult::success(start, Value::List(Vec::new()));
                while result.index() < text.len() {
                    let attempt = self.run(*inner, text, result.index());
                    if !attempt.is_success() {
                        break;
                    }
                    if attempt.index() == result.index() {
                        // A child that consumes nothing would repeat
                        // forever; surface the grammar bug instead.
                        return ParseResult::failure(attempt.index(), "");
                    }
                    result.merge(attempt);
                }
                result
            }
        }
    }
}
