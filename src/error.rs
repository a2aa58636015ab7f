//! Error kinds raised while building or addressing patterns.
//!
//! A failed match is never an error: match operations return `Option`
//! and scanners return `None` without moving their cursor. The variants
//! here cover the ways a pattern can be *mis-built* or mis-addressed.

use thiserror::Error;

/// Error raised while building a [`Pattern`](crate::Pattern) or
/// addressing its sub-patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// A sub-pattern name was used twice within one pattern.
    #[error("duplicate sub-pattern name `{0}`")]
    DuplicateName(String),

    /// A selector referred to a sub-pattern name that does not exist.
    #[error("no sub-pattern named `{0}`")]
    UnknownName(String),

    /// A selector referred to a sub-pattern index past the end.
    #[error("sub-pattern index {index} out of range for pattern of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of sub-patterns in the pattern under construction.
        len: usize,
    },
}
