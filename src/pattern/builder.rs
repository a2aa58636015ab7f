// SPDX-License-Identifier: MIT

//! Fluent construction of [`Pattern`]s.
//!
//! The builder appends one sub-pattern per factory call. Every factory
//! comes in four forms: the base form, `*_opt` (optional),
//! `least_one_*` (one or more), and `zero_or_more_*` (zero or more).
//! Post-modifiers ([`named`](PatternBuilder::named),
//! [`capture`](PatternBuilder::capture), …) adjust the most recently
//! added sub-pattern, [`with_options`](PatternBuilder::with_options)
//! scopes defaults over a block, and
//! [`set_options_for`](PatternBuilder::set_options_for) retroactively
//! updates sub-patterns addressed by index, name, range, or index list.
//!
//! Errors (duplicate names, bad selectors) are recorded at the
//! offending call and surfaced by [`finish`](PatternBuilder::finish);
//! construction aborts with the first one.

use std::collections::HashMap;
use std::ops::{Range, RangeBounds, RangeInclusive};

use regex::Regex;

use crate::error::PatternError;
use crate::pattern::subpattern::{Options, SubPattern};
use crate::pattern::Pattern;
use crate::predicate::{self, Predicate, Presence};

/// Accumulates sub-patterns and option scopes for [`Pattern::build`].
pub struct PatternBuilder<T> {
    subpatterns: Vec<SubPattern<T>>,
    names: HashMap<String, usize>,
    root: Options<T>,
    scopes: Vec<Options<T>>,
    error: Option<PatternError>,
}

macro_rules! derived_variants {
    ($(
        $base:ident $(<$($gen:ident),+>)? ( $($arg:ident: $ty:ty),* ) where [ $($bounds:tt)* ]
            => $opt:ident, $least:ident, $zero:ident;
    )+) => {$(
        #[doc = concat!("[`", stringify!($base), "`](Self::", stringify!($base), ") with `optional` set: may match zero elements.")]
        pub fn $opt $(<$($gen),+>)? (&mut self $(, $arg: $ty)*) -> &mut Self
        where
            $($bounds)*
        {
            self.$base($($arg),*).optional()
        }

        #[doc = concat!("[`", stringify!($base), "`](Self::", stringify!($base), ") with `repeat` set: matches one or more consecutive elements.")]
        pub fn $least $(<$($gen),+>)? (&mut self $(, $arg: $ty)*) -> &mut Self
        where
            $($bounds)*
        {
            self.$base($($arg),*).repeated()
        }

        #[doc = concat!("[`", stringify!($base), "`](Self::", stringify!($base), ") with `repeat` and `optional` set: matches zero or more consecutive elements.")]
        pub fn $zero $(<$($gen),+>)? (&mut self $(, $arg: $ty)*) -> &mut Self
        where
            $($bounds)*
        {
            self.$base($($arg),*).repeated().optional()
        }
    )+};
}

impl<T> Default for PatternBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PatternBuilder<T> {
    /// An empty builder with stock defaults (mandatory, single-match,
    /// capturing, no gaps).
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(Options::default())
    }

    /// An empty builder whose root option scope is `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: Options<T>) -> Self {
        Self {
            subpatterns: Vec::new(),
            names: HashMap::new(),
            root: defaults,
            scopes: Vec::new(),
            error: None,
        }
    }

    fn current_scope(&self) -> &Options<T> {
        self.scopes.last().unwrap_or(&self.root)
    }

    fn push_sub(&mut self, evaluator: Predicate<T>) -> &mut Self {
        if self.error.is_none() {
            self.subpatterns
                .push(SubPattern::new(evaluator, self.current_scope()));
        }
        self
    }

    fn modify_last(&mut self, f: impl FnOnce(&mut SubPattern<T>)) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match self.subpatterns.last_mut() {
            Some(sub) => f(sub),
            None => {
                self.error = Some(PatternError::IndexOutOfRange { index: 0, len: 0 });
            }
        }
        self
    }

    fn set_name(&mut self, index: usize, name: String) {
        if self.names.contains_key(&name) {
            self.error = Some(PatternError::DuplicateName(name));
            return;
        }
        if let Some(old) = self.subpatterns[index].name().map(str::to_owned) {
            self.names.remove(&old);
        }
        self.names.insert(name.clone(), index);
        self.subpatterns[index].set_name(name);
    }

    fn apply_to(&mut self, index: usize, opts: &Options<T>) {
        self.subpatterns[index].apply(opts);
        if let Some(name) = &opts.name {
            self.set_name(index, name.clone());
        }
    }

    /// Appends a sub-pattern matching any value.
    pub fn any(&mut self) -> &mut Self
    where
        T: 'static,
    {
        self.push_sub(predicate::any())
    }

    /// Appends a sub-pattern matching values equal to `expected`.
    pub fn value_eq(&mut self, expected: T) -> &mut Self
    where
        T: PartialEq + Send + Sync + 'static,
    {
        self.push_sub(predicate::value_eq(expected))
    }

    /// Appends a sub-pattern matching values not equal to `unexpected`.
    pub fn value_neq(&mut self, unexpected: T) -> &mut Self
    where
        T: PartialEq + Send + Sync + 'static,
    {
        self.push_sub(predicate::value_neq(unexpected))
    }

    /// Appends a sub-pattern matching values inside `range`.
    pub fn value_in<R>(&mut self, range: R) -> &mut Self
    where
        T: PartialOrd + Send + Sync + 'static,
        R: RangeBounds<T> + Send + Sync + 'static,
    {
        self.push_sub(predicate::value_in(range))
    }

    /// Appends a sub-pattern matching values for which `test` is true.
    ///
    /// The conventional spelling of a type or variant check over a
    /// heterogeneous value enum, via `matches!`.
    pub fn value_of<F>(&mut self, test: F) -> &mut Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push_sub(predicate::value_of(test))
    }

    /// Appends a sub-pattern matching present values (see [`Presence`]).
    pub fn present(&mut self) -> &mut Self
    where
        T: Presence + 'static,
    {
        self.push_sub(predicate::present())
    }

    /// Appends a sub-pattern matching absent values.
    pub fn absent(&mut self) -> &mut Self
    where
        T: Presence + 'static,
    {
        self.push_sub(predicate::absent())
    }

    /// Appends a sub-pattern matching string-like values against `re`.
    pub fn match_regexp(&mut self, re: Regex) -> &mut Self
    where
        T: AsRef<str> + 'static,
    {
        self.push_sub(predicate::match_regexp(re))
    }

    /// Appends a sub-pattern backed by an arbitrary full-context
    /// predicate. The escape hatch for tests the factories cannot
    /// express.
    pub fn satisfies(&mut self, predicate: Predicate<T>) -> &mut Self {
        self.push_sub(predicate)
    }

    derived_variants! {
        any() where [T: 'static]
            => any_opt, least_one_any, zero_or_more_any;
        value_eq(expected: T) where [T: PartialEq + Send + Sync + 'static]
            => value_eq_opt, least_one_value_eq, zero_or_more_value_eq;
        value_neq(unexpected: T) where [T: PartialEq + Send + Sync + 'static]
            => value_neq_opt, least_one_value_neq, zero_or_more_value_neq;
        value_in<R>(range: R) where [T: PartialOrd + Send + Sync + 'static, R: RangeBounds<T> + Send + Sync + 'static]
            => value_in_opt, least_one_value_in, zero_or_more_value_in;
        value_of<F>(test: F) where [F: Fn(&T) -> bool + Send + Sync + 'static]
            => value_of_opt, least_one_value_of, zero_or_more_value_of;
        present() where [T: Presence + 'static]
            => present_opt, least_one_present, zero_or_more_present;
        absent() where [T: Presence + 'static]
            => absent_opt, least_one_absent, zero_or_more_absent;
        match_regexp(re: Regex) where [T: AsRef<str> + 'static]
            => match_regexp_opt, least_one_match_regexp, zero_or_more_match_regexp;
    }

    /// Names the most recently added sub-pattern for named-group
    /// retrieval. Names must be unique within a pattern.
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.subpatterns.is_empty() {
            self.error = Some(PatternError::IndexOutOfRange { index: 0, len: 0 });
            return self;
        }
        let index = self.subpatterns.len() - 1;
        self.set_name(index, name.into());
        self
    }

    /// Marks the most recently added sub-pattern optional.
    pub fn optional(&mut self) -> &mut Self {
        self.modify_last(|sub| sub.set_optional(true))
    }

    /// Marks the most recently added sub-pattern repeating.
    pub fn repeated(&mut self) -> &mut Self {
        self.modify_last(|sub| sub.set_repeat(true))
    }

    /// Sets the capture flag of the most recently added sub-pattern.
    pub fn capture(&mut self, capture: bool) -> &mut Self {
        self.modify_last(|sub| sub.set_capture(capture))
    }

    /// Sets the gap allowance of the most recently added sub-pattern.
    pub fn allow_gaps(&mut self, allow_gaps: bool) -> &mut Self {
        self.modify_last(|sub| sub.set_allow_gaps(allow_gaps))
    }

    /// Sets the gap break condition of the most recently added
    /// sub-pattern: gap-skipping stops at the first value for which the
    /// predicate is true.
    pub fn break_when(&mut self, gap_break: Predicate<T>) -> &mut Self {
        self.modify_last(|sub| sub.set_gap_break(gap_break))
    }

    /// Applies an option set to the most recently added sub-pattern.
    pub fn with(&mut self, opts: &Options<T>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        if self.subpatterns.is_empty() {
            self.error = Some(PatternError::IndexOutOfRange { index: 0, len: 0 });
            return self;
        }
        let index = self.subpatterns.len() - 1;
        self.apply_to(index, opts);
        self
    }

    /// Pushes `opts` as scoped defaults for the duration of `body`.
    ///
    /// Scopes nest: unset fields inherit from the enclosing scope, and
    /// the previous scope is restored when the closure returns. Names
    /// never flow through scopes.
    pub fn with_options<F>(&mut self, opts: Options<T>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let merged = opts.or_inherit(self.current_scope());
        self.scopes.push(merged);
        body(self);
        self.scopes.pop();
        self
    }

    /// Retroactively applies an option set to the sub-patterns addressed
    /// by `selector`: an index, a name, an index range, or a slice of
    /// indices.
    pub fn set_options_for<S: Selector>(&mut self, selector: S, opts: &Options<T>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match selector.select(self.subpatterns.len(), &self.names) {
            Ok(indices) => {
                for index in indices {
                    if self.error.is_some() {
                        break;
                    }
                    self.apply_to(index, opts);
                }
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Finalizes the pattern.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded during construction.
    pub fn finish(self) -> Result<Pattern<T>, PatternError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Pattern::from_parts(self.subpatterns, self.names)),
        }
    }
}

/// Sub-pattern addressing accepted by
/// [`PatternBuilder::set_options_for`].
pub trait Selector {
    /// Resolves to a list of sub-pattern indices.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::IndexOutOfRange`] or
    /// [`PatternError::UnknownName`] when the selector does not resolve.
    fn select(
        &self,
        len: usize,
        names: &HashMap<String, usize>,
    ) -> Result<Vec<usize>, PatternError>;
}

fn check_index(index: usize, len: usize) -> Result<usize, PatternError> {
    if index < len {
        Ok(index)
    } else {
        Err(PatternError::IndexOutOfRange { index, len })
    }
}

impl Selector for usize {
    fn select(
        &self,
        len: usize,
        _names: &HashMap<String, usize>,
    ) -> Result<Vec<usize>, PatternError> {
        Ok(vec![check_index(*self, len)?])
    }
}

impl Selector for &str {
    fn select(
        &self,
        _len: usize,
        names: &HashMap<String, usize>,
    ) -> Result<Vec<usize>, PatternError> {
        names
            .get(*self)
            .map(|&i| vec![i])
            .ok_or_else(|| PatternError::UnknownName((*self).to_string()))
    }
}

impl Selector for Range<usize> {
    fn select(
        &self,
        len: usize,
        _names: &HashMap<String, usize>,
    ) -> Result<Vec<usize>, PatternError> {
        self.clone().map(|i| check_index(i, len)).collect()
    }
}

impl Selector for RangeInclusive<usize> {
    fn select(
        &self,
        len: usize,
        _names: &HashMap<String, usize>,
    ) -> Result<Vec<usize>, PatternError> {
        self.clone().map(|i| check_index(i, len)).collect()
    }
}

impl Selector for &[usize] {
    fn select(
        &self,
        len: usize,
        _names: &HashMap<String, usize>,
    ) -> Result<Vec<usize>, PatternError> {
        self.iter().map(|&i| check_index(i, len)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_methods_set_flags() {
        let p = Pattern::build(|b| {
            b.value_eq(1)
                .value_eq_opt(2)
                .least_one_value_eq(3)
                .zero_or_more_value_eq(4);
        })
        .unwrap();
        let flags: Vec<(bool, bool)> = (0..p.len())
            .map(|i| {
                let sub = p.at(i).unwrap();
                (sub.optional(), sub.repeat())
            })
            .collect();
        assert_eq!(
            flags,
            vec![(false, false), (true, false), (false, true), (true, true)]
        );
    }

    #[test]
    fn test_named_lookup_after_build() {
        let p = Pattern::build(|b| {
            b.value_eq(1).named("head").any().named("rest");
        })
        .unwrap();
        assert!(p.at("head").is_some());
        assert!(p.at("rest").is_some());
        assert!(p.at("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_aborts_build() {
        let err = Pattern::build(|b: &mut PatternBuilder<i32>| {
            b.value_eq(1).named("x").value_eq(2).named("x");
        })
        .unwrap_err();
        assert_eq!(err, PatternError::DuplicateName("x".to_string()));
    }

    #[test]
    fn test_modifier_without_subpattern_is_an_error() {
        let err = Pattern::build(|b: &mut PatternBuilder<i32>| {
            b.optional();
        })
        .unwrap_err();
        assert!(matches!(err, PatternError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_with_options_scope_applies_and_restores() {
        let p = Pattern::build(|b| {
            b.value_eq(0);
            b.with_options(Options::new().optional(true).capture(false), |b| {
                b.value_eq(1).value_eq(2);
            });
            b.value_eq(3);
        })
        .unwrap();
        assert!(!p.at(0).unwrap().optional());
        assert!(p.at(1).unwrap().optional());
        assert!(!p.at(1).unwrap().capture());
        assert!(p.at(2).unwrap().optional());
        assert!(!p.at(3).unwrap().optional());
        assert!(p.at(3).unwrap().capture());
    }

    #[test]
    fn test_with_options_scopes_nest() {
        let p = Pattern::build(|b| {
            b.with_options(Options::new().optional(true), |b| {
                b.value_eq(1);
                b.with_options(Options::new().repeat(true), |b| {
                    b.value_eq(2);
                });
                b.value_eq(3);
            });
        })
        .unwrap();
        assert!(p.at(0).unwrap().optional() && !p.at(0).unwrap().repeat());
        assert!(p.at(1).unwrap().optional() && p.at(1).unwrap().repeat());
        assert!(p.at(2).unwrap().optional() && !p.at(2).unwrap().repeat());
    }

    #[test]
    fn test_build_with_defaults() {
        let p = Pattern::build_with(Options::new().allow_gaps(true), |b| {
            b.value_eq(1).value_eq(2).allow_gaps(false);
        })
        .unwrap();
        assert!(p.at(0).unwrap().allow_gaps());
        assert!(!p.at(1).unwrap().allow_gaps());
    }

    #[test]
    fn test_set_options_for_index_and_name() {
        let p = Pattern::build(|b| {
            b.value_eq(1).named("a").value_eq(2).value_eq(3);
            b.set_options_for(1_usize, &Options::new().optional(true));
            b.set_options_for("a", &Options::new().capture(false));
        })
        .unwrap();
        assert!(p.at(1).unwrap().optional());
        assert!(!p.at(0).unwrap().capture());
    }

    #[test]
    fn test_set_options_for_range() {
        let p = Pattern::build(|b| {
            b.value_eq(1).value_eq(2).value_eq(3).value_eq(4);
            b.set_options_for(1..3, &Options::new().repeat(true));
        })
        .unwrap();
        let repeats: Vec<bool> = (0..4).map(|i| p.at(i).unwrap().repeat()).collect();
        assert_eq!(repeats, vec![false, true, true, false]);
    }

    #[test]
    fn test_set_options_for_slice_and_inclusive_range() {
        let p = Pattern::build(|b| {
            b.value_eq(1).value_eq(2).value_eq(3);
            b.set_options_for(&[0, 2][..], &Options::new().optional(true));
            b.set_options_for(0..=0, &Options::new().capture(false));
        })
        .unwrap();
        assert!(p.at(0).unwrap().optional());
        assert!(!p.at(1).unwrap().optional());
        assert!(p.at(2).unwrap().optional());
        assert!(!p.at(0).unwrap().capture());
    }

    #[test]
    fn test_set_options_for_unknown_name() {
        let err = Pattern::build(|b: &mut PatternBuilder<i32>| {
            b.value_eq(1);
            b.set_options_for("ghost", &Options::new().optional(true));
        })
        .unwrap_err();
        assert_eq!(err, PatternError::UnknownName("ghost".to_string()));
    }

    #[test]
    fn test_set_options_for_out_of_range() {
        let err = Pattern::build(|b: &mut PatternBuilder<i32>| {
            b.value_eq(1);
            b.set_options_for(5_usize, &Options::new().optional(true));
        })
        .unwrap_err();
        assert_eq!(err, PatternError::IndexOutOfRange { index: 5, len: 1 });
    }

    #[test]
    fn test_set_options_for_can_name() {
        let p = Pattern::build(|b| {
            b.value_eq(1).value_eq(2);
            b.set_options_for(1_usize, &Options::new().name("tail"));
        })
        .unwrap();
        assert_eq!(p.at("tail").unwrap().name(), Some("tail"));
    }

    #[test]
    fn test_renaming_frees_old_name() {
        let p = Pattern::build(|b| {
            b.value_eq(1).named("old");
            b.set_options_for(0_usize, &Options::new().name("new"));
            b.value_eq(2).named("old");
        })
        .unwrap();
        assert!(p.at("new").is_some());
        assert_eq!(p.at("old").map(|s| s.name()), Some(Some("old")));
    }

    #[test]
    fn test_first_error_wins() {
        let err = Pattern::build(|b: &mut PatternBuilder<i32>| {
            b.value_eq(1).named("x").value_eq(2).named("x");
            b.set_options_for("ghost", &Options::new().optional(true));
        })
        .unwrap_err();
        assert_eq!(err, PatternError::DuplicateName("x".to_string()));
    }

    #[test]
    fn test_factories_compile_for_all_kinds() {
        let p = Pattern::build(|b: &mut PatternBuilder<&str>| {
            b.any()
                .value_neq("x")
                .value_in("a".."z")
                .present_opt()
                .zero_or_more_absent()
                .match_regexp(Regex::new("^b").unwrap());
        })
        .unwrap();
        assert_eq!(p.len(), 6);
    }
}
