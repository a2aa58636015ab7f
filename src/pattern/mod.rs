// SPDX-License-Identifier: MIT

//! Pattern construction and matching.
//!
//! A [`Pattern`] is an ordered list of [`SubPattern`]s, each pairing a
//! predicate with match-modifier flags (`optional`, `repeat`,
//! `capture`, `allow_gaps`, a gap break condition, an optional name).
//! Matching assigns input values to sub-patterns, greedily preferring
//! the assignment that consumes the most input, and returns the
//! captured groups as a [`Match`].
//!
//! # Example
//!
//! ```
//! use seqmatch::Pattern;
//!
//! let p = Pattern::build(|b| {
//!     b.value_eq(1).named("head")
//!         .value_eq_opt(2)
//!         .least_one_value_eq(4);
//! })
//! .unwrap();
//!
//! let (m, next) = p.captures_with_position(&[1, 4, 4, 9]).unwrap();
//! assert_eq!(m.name("head"), Some(&[1][..]));
//! assert_eq!(m.group(2), Some(&[4, 4][..]));
//! assert_eq!(next, 3);
//! ```

mod builder;
mod matched;
mod matcher;
mod subpattern;

pub use builder::{PatternBuilder, Selector};
pub use matched::{GroupKey, Match};
pub use subpattern::{Options, SubPattern};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::PatternError;

/// An ordered sequence of sub-patterns matched greedily against input
/// sequences.
///
/// Patterns are immutable once built and safe to share across threads
/// (matching keeps all its state on the caller's stack).
pub struct Pattern<T> {
    subpatterns: Vec<SubPattern<T>>,
    by_name: HashMap<String, usize>,
    last_mandatory: Option<usize>,
    captured_count: usize,
    capture_names: Arc<HashMap<String, usize>>,
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("subpatterns", &self.subpatterns)
            .field("last_mandatory", &self.last_mandatory)
            .finish()
    }
}

impl<T> Pattern<T> {
    /// Builds a pattern via the fluent [`PatternBuilder`] API.
    ///
    /// # Errors
    ///
    /// Returns the first error the builder recorded (duplicate name,
    /// bad selector).
    pub fn build<F>(f: F) -> Result<Self, PatternError>
    where
        F: FnOnce(&mut PatternBuilder<T>),
    {
        Self::build_with(Options::default(), f)
    }

    /// Builds a pattern with `defaults` as the root option scope, so
    /// every appended sub-pattern inherits them unless overridden.
    ///
    /// # Errors
    ///
    /// Returns the first error the builder recorded.
    pub fn build_with<F>(defaults: Options<T>, f: F) -> Result<Self, PatternError>
    where
        F: FnOnce(&mut PatternBuilder<T>),
    {
        let mut builder = PatternBuilder::with_defaults(defaults);
        f(&mut builder);
        builder.finish()
    }

    pub(crate) fn from_parts(
        subpatterns: Vec<SubPattern<T>>,
        by_name: HashMap<String, usize>,
    ) -> Self {
        let last_mandatory = subpatterns.iter().rposition(|s| !s.optional());
        let mut slot = 0_usize;
        let mut slots = Vec::with_capacity(subpatterns.len());
        for sub in &subpatterns {
            slots.push(sub.capture().then(|| {
                let s = slot;
                slot += 1;
                s
            }));
        }
        let capture_names = by_name
            .iter()
            .filter_map(|(name, &i)| slots[i].map(|s| (name.clone(), s)))
            .collect();
        Self {
            subpatterns,
            by_name,
            last_mandatory,
            captured_count: slot,
            capture_names: Arc::new(capture_names),
        }
    }

    /// Number of sub-patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subpatterns.len()
    }

    /// True for the empty pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpatterns.is_empty()
    }

    /// Index of the last mandatory (non-optional) sub-pattern, `None`
    /// when every sub-pattern is optional.
    #[must_use]
    pub const fn last_mandatory(&self) -> Option<usize> {
        self.last_mandatory
    }

    /// The sub-pattern addressed by index or name.
    #[must_use]
    pub fn at<K: SubPatternKey>(&self, key: K) -> Option<&SubPattern<T>> {
        self.subpatterns.get(key.index_in(self)?)
    }

    pub(crate) fn subpatterns(&self) -> &[SubPattern<T>] {
        &self.subpatterns
    }

    /// True if the pattern matches at the start of `values`.
    #[must_use]
    pub fn is_match(&self, values: &[T]) -> bool {
        matcher::search(self, values).is_some()
    }

    /// Matches at the start of `values`, returning the captured groups
    /// of the best (longest, then largest) match.
    #[must_use]
    pub fn captures(&self, values: &[T]) -> Option<Match<T>>
    where
        T: Clone,
    {
        self.captures_real(values).map(|(m, _)| m)
    }

    /// Like [`captures`](Self::captures), additionally returning the
    /// index just past the last consumed element.
    ///
    /// When no normal match exists but every sub-pattern is optional,
    /// returns the degenerate all-empty match at position 0.
    #[must_use]
    pub fn captures_with_position(&self, values: &[T]) -> Option<(Match<T>, usize)>
    where
        T: Clone,
    {
        match self.captures_real(values) {
            Some(win) => Some(win),
            None if self.last_mandatory.is_none() => Some((self.empty_match(), 0)),
            None => None,
        }
    }

    /// A normal match with its next position; never the degenerate case.
    pub(crate) fn captures_real(&self, values: &[T]) -> Option<(Match<T>, usize)>
    where
        T: Clone,
    {
        let win = matcher::search(self, values)?;
        let next_pos = win.next_pos;
        Some((self.project(win.groups, values), next_pos))
    }

    /// Number of non-overlapping matches across `values`, scanning
    /// forward past each match.
    #[must_use]
    pub fn count(&self, values: &[T]) -> usize {
        let mut count = 0;
        let mut pos = 0;
        'outer: while pos < values.len() {
            for start in pos..values.len() {
                if let Some(win) = matcher::search(self, &values[start..]) {
                    count += 1;
                    pos = start + win.next_pos;
                    continue 'outer;
                }
            }
            break;
        }
        count
    }

    /// Projects index groups down to captured, owned groups.
    fn project(&self, groups: Vec<Vec<usize>>, values: &[T]) -> Match<T>
    where
        T: Clone,
    {
        let captured = self
            .subpatterns
            .iter()
            .zip(groups)
            .filter(|(sub, _)| sub.capture())
            .map(|(_, group)| group.into_iter().map(|i| values[i].clone()).collect())
            .collect();
        Match::new(captured, Arc::clone(&self.capture_names))
    }

    fn empty_match(&self) -> Match<T> {
        Match::new(
            (0..self.captured_count).map(|_| Vec::new()).collect(),
            Arc::clone(&self.capture_names),
        )
    }
}

/// Key types accepted by [`Pattern::at`]: indices and names.
pub trait SubPatternKey {
    /// Resolves the key to a sub-pattern index.
    fn index_in<T>(&self, pattern: &Pattern<T>) -> Option<usize>;
}

impl SubPatternKey for usize {
    fn index_in<T>(&self, pattern: &Pattern<T>) -> Option<usize> {
        (*self < pattern.subpatterns.len()).then_some(*self)
    }
}

impl SubPatternKey for &str {
    fn index_in<T>(&self, pattern: &Pattern<T>) -> Option<usize> {
        pattern.by_name.get(*self).copied()
    }
}
