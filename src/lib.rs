//! Forelle - recursive-descent parser combinators
//!
//! This library provides small recognizers (literals, anchored regular
//! expressions, end of input) and the combinators to wire them into a
//! grammar: sequencing, alternation, repetition, mapping, and forward
//! references for recursion. Every parser maps `(text, start)` to the
//! same [`ParseResult`] shape, so anything can be composed with anything.
//!
//! Failures report the furthest offset any branch reached together with
//! the set of tokens that would have been accepted there, which keeps
//! error messages useful under backtracking.
//!
//! ```
//! use forelle::{Grammar, Value};
//!
//! let mut g = Grammar::new();
//! let digits = g.regex(r"\d+").unwrap();
//! let number = g.map(digits, |v| match v.as_str().and_then(|s| s.parse().ok()) {
//!     Some(n) => Value::Int(n),
//!     None => v,
//! });
//!
//! let result = g.parse(number, "1234");
//! assert_eq!(result.into_value(), Some(Value::Int(1234)));
//! ```

mod engine;
pub mod error;
pub mod grammar;
pub mod result;
pub mod value;

pub use error::GrammarError;
pub use grammar::{Grammar, ParserId};
pub use result::ParseResult;
pub use value::Value;
