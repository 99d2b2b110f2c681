//! Shared error type for both pipelines.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditError>;

/// Everything that can go wrong while extracting edits or segmenting a
/// source. Fatal by construction: recoverable conditions (dropped units,
/// opaque environments) are reported as values, not errors.
#[derive(Debug, Error)]
pub enum EditError {
    /// A page-anchored annotation intersects no text line on its page.
    #[error("annotation {xref} on page {pageno} intersects no text line")]
    NoIntersectingLine { xref: u32, pageno: u32 },

    /// The response thread under a root violates the expected shape.
    #[error("malformed responses to annotation {xref}: {msg}")]
    MalformedTopology { xref: u32, msg: String },

    /// A strikeout/caret pair whose comments do not identify which half
    /// carries the edit text.
    #[error("cannot collapse annotations {root} and {other} into a replacement: {msg}")]
    UnsupportedReplacePair { root: u32, other: u32, msg: String },

    /// Parsed nodes do not reassemble to the input byte for byte.
    #[error("parse is not lossless: {context}")]
    LossyParse { context: String },

    /// A `\begin` without its matching `\end` (or vice versa).
    #[error("unbalanced environment {name} at byte {pos}")]
    UnbalancedEnvironment { name: String, pos: usize },

    /// A delimited construct ran off the end of the source.
    #[error("unterminated {what} starting at byte {pos}")]
    Unterminated { what: &'static str, pos: usize },

    /// The source does not contain exactly one document environment.
    #[error("expected exactly one document environment, found {0}")]
    DocumentCount(usize),

    /// A macro that requires a braced argument appeared without one.
    #[error("\\{name} is missing its braced argument")]
    MissingMacroArgument { name: String },

    /// A box-log line does not match the record grammar.
    #[error("box log line {lineno} is malformed: {line:?}")]
    LogSyntax { lineno: usize, line: String },

    /// A unit's records are incomplete or duplicated.
    #[error("box log unit {id}: {msg}")]
    LogRecord { id: String, msg: String },

    /// The log accounts for a different number of units than were marked.
    #[error("box log holds {got} units, expected {expected}")]
    LogCount { got: usize, expected: usize },

    /// An external tool exited nonzero.
    #[error("{tool} failed with status {status}: {detail}")]
    ToolFailure {
        tool: &'static str,
        status: i32,
        detail: String,
    },

    /// An external tool exceeded its wall-clock limit.
    #[error("{tool} did not finish within {seconds}s")]
    ToolTimeout { tool: &'static str, seconds: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
