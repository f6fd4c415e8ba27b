//! Grammar construction.
//!
//! A [`Grammar`] owns every parser node built for one grammar and hands
//! out [`ParserId`] handles. All primitive and combinator factories live
//! here; evaluation lives in the engine module.
//!
//! Construction takes `&mut Grammar`, parsing takes `&Grammar`. A fully
//! built grammar is immutable, so it can be shared across threads and the
//! same node can appear at any number of positions in the graph.

use regex::{Regex, RegexBuilder};

use crate::error::GrammarError;
use crate::value::Value;

/// Handle to a parser node inside one [`Grammar`].
///
/// Handles are plain indices: cheap to copy and stable for the life of
/// the grammar that created them. A handle is only meaningful for its own
/// grammar; using it with another one selects an unrelated node or panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId(pub(crate) usize);

/// Closure attached to a `map` node.
///
/// Mappers must be `Send + Sync` so that a finished grammar can be parsed
/// from several threads at once. A mapper that captures mutable state has
/// to bring its own synchronization.
pub(crate) type Mapper = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// One immutable parser node. The variant is the parser's whole state;
/// nothing here changes after construction, apart from the one-shot
/// `Forward` patch applied by [`Grammar::define`].
pub(crate) enum ParserNode {
    Literal {
        text: String,
        case_sensitive: bool,
    },
    Pattern {
        pattern: String,
        regex: Regex,
        group: usize,
    },
    Eof,
    Forward {
        target: Option<ParserId>,
    },
    Sequence {
        children: Vec<ParserId>,
    },
    Alternative {
        children: Vec<ParserId>,
    },
    Map {
        inner: ParserId,
        mapper: Mapper,
    },
    Times {
        inner: ParserId,
        min: u32,
        max: u32,
    },
    Many {
        inner: ParserId,
    },
}

/// Owner of a parser graph.
///
/// The grammar is the arena: nodes are allocated by the factory methods,
/// handed out as [`ParserId`] handles, and dropped together when the
/// grammar is dropped. Graphs never span grammars.
///
/// ```
/// use forelle::{Grammar, Value};
///
/// let mut g = Grammar::new();
/// let quote = g.literal("\"");
/// let word = g.regex(r"\w+").unwrap();
/// let quoted = g.sequence(&[quote, word, quote]);
/// let key = g.map(quoted, |value| match value {
///     Value::List(mut items) => items.remove(1),
///     other => other,
/// });
///
/// let result = g.parse(key, "\"key\"");
/// assert!(result.is_success());
/// assert_eq!(result.value().and_then(|v| v.as_str()), Some("key"));
/// ```
#[derive(Default)]
pub struct Grammar {
    pub(crate) nodes: Vec<ParserNode>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar { nodes: Vec::new() }
    }

    fn push(&mut self, node: ParserNode) -> ParserId {
        let id = ParserId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Matches `text` exactly at the current position and yields the
    /// matched substring. Fails at the start position with `text` as the
    /// expectation, including when the remaining input is too short.
    pub fn literal(&mut self, text: impl Into<String>) -> ParserId {
        self.push(ParserNode::Literal {
            text: text.into(),
            case_sensitive: true,
        })
    }

    /// Like [`literal`](Grammar::literal), but compares ASCII
    /// case-insensitively. The yielded substring keeps the input's case.
    pub fn literal_no_case(&mut self, text: impl Into<String>) -> ParserId {
        self.push(ParserNode::Literal {
            text: text.into(),
            case_sensitive: false,
        })
    }

    /// Matches `pattern` anchored at the current position and yields the
    /// whole match. Fails at the start position with the raw pattern
    /// string as the expectation.
    pub fn regex(&mut self, pattern: &str) -> Result<ParserId, GrammarError> {
        self.pattern(pattern, 0, true)
    }

    /// Like [`regex`](Grammar::regex), but yields the text of capture
    /// group `group`. Group 0 is the whole match; the position still
    /// advances by the length of the whole match. A group that did not
    /// participate in the match yields the empty string.
    pub fn regex_group(&mut self, pattern: &str, group: usize) -> Result<ParserId, GrammarError> {
        self.pattern(pattern, group, true)
    }

    /// Case-insensitive [`regex`](Grammar::regex).
    pub fn regex_no_case(&mut self, pattern: &str) -> Result<ParserId, GrammarError> {
        self.pattern(pattern, 0, false)
    }

    /// Case-insensitive [`regex_group`](Grammar::regex_group).
    pub fn regex_group_no_case(
        &mut self,
        pattern: &str,
        group: usize,
    ) -> Result<ParserId, GrammarError> {
        self.pattern(pattern, group, false)
    }

    fn pattern(
        &mut self,
        pattern: &str,
        group: usize,
        case_sensitive: bool,
    ) -> Result<ParserId, GrammarError> {
        // Anchor with a non-capturing group so group numbers and top-level
        // alternations in the user's pattern survive unchanged.
        let compiled = RegexBuilder::new(&format!("^(?:{})", pattern))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|source| GrammarError::InvalidPattern {
                pattern: pattern.to_owned(),
                source: Box::new(source),
            })?;
        if group >= compiled.captures_len() {
            return Err(GrammarError::UnknownGroup {
                pattern: pattern.to_owned(),
                group,
            });
        }
        Ok(self.push(ParserNode::Pattern {
            pattern: pattern.to_owned(),
            regex: compiled,
            group,
        }))
    }

    /// Succeeds with `Value::Unit` only at the end of the input;
    /// otherwise fails with expectation `"EOF"`.
    pub fn eof(&mut self) -> ParserId {
        self.push(ParserNode::Eof)
    }

    /// whitespace := `\s+`
    pub fn whitespace(&mut self) -> ParserId {
        self.pattern(r"\s+", 0, true)
            .expect(r"\s+ is a valid pattern")
    }

    /// optional_whitespace := `\s*`
    pub fn optional_whitespace(&mut self) -> ParserId {
        self.pattern(r"\s*", 0, true)
            .expect(r"\s* is a valid pattern")
    }

    /// Declare a parser before its definition exists.
    ///
    /// The returned handle can be wired into other parsers immediately and
    /// patched with [`define`](Grammar::define) once the definition has
    /// been built. This is the recursion mechanism: a grammar that refers
    /// to itself goes through a forward handle, and since nodes only store
    /// handles no ownership cycle can form.
    pub fn forward(&mut self) -> ParserId {
        self.push(ParserNode::Forward { target: None })
    }

    /// Patch a forward declaration to point at its definition.
    ///
    /// # Panics
    ///
    /// Panics when `slot` was not created by [`forward`](Grammar::forward)
    /// or has already been defined. Both are wiring bugs in the calling
    /// grammar, not recoverable conditions.
    pub fn define(&mut self, slot: ParserId, target: ParserId) {
        match &mut self.nodes[slot.0] {
            ParserNode::Forward { target: binding } => {
                if binding.is_some() {
                    panic!("forward parser defined twice");
                }
                *binding = Some(target);
            }
            _ => panic!("define called on a parser that is not a forward declaration"),
        }
    }

    /// Runs `children` left to right, each starting where the previous one
    /// stopped, and yields the list of their values. The first failure is
    /// returned as-is, carrying the furthest offset reached so far. An
    /// empty sequence succeeds with an empty list without consuming.
    pub fn sequence(&mut self, children: &[ParserId]) -> ParserId {
        self.push(ParserNode::Sequence {
            children: children.to_vec(),
        })
    }

    /// Tries `children` left to right, each from the original start
    /// position, and yields the first success. When every child fails, the
    /// failure carries the maximum failure offset and the expectations of
    /// every child that reached it, in declaration order. An empty
    /// alternative fails at the start position with no expectations.
    pub fn alternative(&mut self, children: &[ParserId]) -> ParserId {
        self.push(ParserNode::Alternative {
            children: children.to_vec(),
        })
    }

    /// Applies `mapper` to the value of a successful inner parse. Failures
    /// pass through untouched. Context beyond the parsed value is captured
    /// by the closure.
    pub fn map<F>(&mut self, inner: ParserId, mapper: F) -> ParserId
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.push(ParserNode::Map {
            inner,
            mapper: Box::new(mapper),
        })
    }

    /// then := first second, keeping second's value
    pub fn then(&mut self, first: ParserId, second: ParserId) -> ParserId {
        let pair = self.sequence(&[first, second]);
        self.map(pair, |value| match value {
            Value::List(mut items) => items.remove(1),
            _ => unreachable!("sequence yields a list"),
        })
    }

    /// skip := first second, keeping first's value
    pub fn skip(&mut self, first: ParserId, second: ParserId) -> ParserId {
        let pair = self.sequence(&[first, second]);
        self.map(pair, |value| match value {
            Value::List(mut items) => items.remove(0),
            _ => unreachable!("sequence yields a list"),
        })
    }

    /// or_else := first | second
    pub fn or_else(&mut self, first: ParserId, second: ParserId) -> ParserId {
        self.alternative(&[first, second])
    }

    /// Greedy repetition: tries `inner` up to `max` times, collecting the
    /// values into a list. A failure before `min` successes propagates;
    /// after `min`, the repetition stops and yields what it has, with the
    /// index sitting before the failed attempt.
    pub fn times(&mut self, inner: ParserId, min: u32, max: u32) -> ParserId {
        self.push(ParserNode::Times { inner, min, max })
    }

    /// exactly := times(count, count)
    pub fn exactly(&mut self, inner: ParserId, count: u32) -> ParserId {
        self.times(inner, count, count)
    }

    /// at_least := times(count, unbounded)
    pub fn at_least(&mut self, inner: ParserId, count: u32) -> ParserId {
        self.times(inner, count, u32::MAX)
    }

    /// at_most := times(0, count)
    pub fn at_most(&mut self, inner: ParserId, count: u32) -> ParserId {
        self.times(inner, 0, count)
    }

    /// Unbounded repetition with an infinite-loop guard: a child success
    /// that consumes nothing turns into a failure at the current offset
    /// with a single empty expectation, so a grammar bug surfaces instead
    /// of hanging the parse.
    pub fn many(&mut self, inner: ParserId) -> ParserId {
        self.push(ParserNode::Many { inner })
    }
}
