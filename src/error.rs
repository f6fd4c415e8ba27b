//! Construction-time errors.
//!
//! Parse failures are never errors in this sense; they are ordinary
//! [`ParseResult::Failure`](crate::ParseResult) values. `GrammarError`
//! covers the cases where a parser cannot be built at all.

use thiserror::Error;

/// An error raised while building a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The pattern handed to a regex factory did not compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// The requested capture group does not exist in the compiled pattern.
    #[error("pattern `{pattern}` has no capture group {group}")]
    UnknownGroup { pattern: String, group: usize },
}
