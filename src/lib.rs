//! # `seqmatch` — Sequence Pattern Matching over Arbitrary Values
//!
//! A regular-expression-style engine where each atom is a user-defined
//! predicate over a value, not a character class: patterns match ordered
//! sequences of arbitrary values and return the captured *groups* of
//! elements assigned to each sub-pattern.
//!
//! ## Components
//!
//! | Type | Role |
//! |------|------|
//! | [`Pattern`] | Ordered sub-patterns; `is_match` / `captures` / `captures_with_position` / `count` |
//! | [`SubPattern`] | One predicate plus flags: `optional`, `repeat`, `capture`, `allow_gaps`, break condition, name |
//! | [`PatternBuilder`] | Fluent construction: factories, `*_opt` / `least_one_*` / `zero_or_more_*` variants, option scopes |
//! | [`Match`] | Captured groups with positional, named, and flattened access |
//! | [`Scanner`] / [`StreamScanner`] | Repeated non-overlapping matching along a sequence |
//!
//! ## Example
//!
//! ```
//! use seqmatch::{Pattern, Scanner};
//!
//! // "an 'a', then anything up to the last 'd'"
//! let p = Pattern::build(|b| {
//!     b.value_eq('a').least_one_any().named("middle").value_eq('d');
//! })
//! .unwrap();
//!
//! let values = ['a', 'b', 'c', 'd', 'e', 'd'];
//! let m = p.captures(&values).unwrap();
//! assert_eq!(m.name("middle"), Some(&['b', 'c', 'd', 'e'][..]));
//!
//! let mut scanner = Scanner::new(&values);
//! assert!(scanner.scan(&p).is_some());
//! assert!(scanner.eov());
//! ```
//!
//! Matching is greedy longest-match: of all assignments of input values
//! to sub-patterns, the engine keeps the one consuming the most input,
//! ties broken by total captured element count. A failed match is a
//! value (`None`), never an error; predicate panics propagate to the
//! caller untouched.

pub mod error;
pub mod pattern;
pub mod predicate;
pub mod scanner;

pub use error::PatternError;
pub use pattern::{
    GroupKey, Match, Options, Pattern, PatternBuilder, Selector, SubPattern, SubPatternKey,
};
pub use predicate::{MatchContext, Predicate, Presence};
pub use scanner::{Scanner, StreamScanner};
