//! Match results: the captured groups of a successful match.

use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

/// The result of a successful match: one group of input values per
/// capturing sub-pattern, in sub-pattern order.
///
/// Groups can be empty (optional sub-patterns that matched nothing) or
/// hold several values (repeating sub-patterns). Lookup is positional
/// ([`group`](Match::group)), by name ([`name`](Match::name)), or
/// unified over both ([`at`](Match::at)).
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T> {
    groups: Vec<Vec<T>>,
    by_name: Arc<HashMap<String, usize>>,
}

impl<T> Match<T> {
    pub(crate) fn new(groups: Vec<Vec<T>>, by_name: Arc<HashMap<String, usize>>) -> Self {
        Self { groups, by_name }
    }

    /// The group at captured position `i`.
    #[must_use]
    pub fn group(&self, i: usize) -> Option<&[T]> {
        self.groups.get(i).map(Vec::as_slice)
    }

    /// The group captured by the sub-pattern named `name`.
    ///
    /// Returns `None` for unknown names and for named sub-patterns whose
    /// `capture` flag is off.
    #[must_use]
    pub fn name(&self, name: &str) -> Option<&[T]> {
        self.group(*self.by_name.get(name)?)
    }

    /// Unified lookup by captured index or name.
    #[must_use]
    pub fn at<K: GroupKey>(&self, key: K) -> Option<&[T]> {
        self.group(key.index_in(self)?)
    }

    /// Number of captured groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no groups were captured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of captured values across all groups.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Iterates over the captured groups in order.
    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.groups.iter().map(Vec::as_slice)
    }

    /// Iterates over every captured value in input order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.groups.iter().flatten()
    }

    /// The first captured value.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.values().next()
    }

    /// The last captured value.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.groups.iter().rev().find_map(|g| g.last())
    }
}

impl<T> Index<usize> for Match<T> {
    type Output = [T];

    fn index(&self, i: usize) -> &[T] {
        &self.groups[i]
    }
}

/// Key types accepted by [`Match::at`]: captured indices and names.
pub trait GroupKey {
    /// Resolves the key to a captured group index.
    fn index_in<T>(&self, m: &Match<T>) -> Option<usize>;
}

impl GroupKey for usize {
    fn index_in<T>(&self, m: &Match<T>) -> Option<usize> {
        (*self < m.groups.len()).then_some(*self)
    }
}

impl GroupKey for &str {
    fn index_in<T>(&self, m: &Match<T>) -> Option<usize> {
        m.by_name.get(*self).copied()
    }
}
