//! Predicates over sequence values, and the factories that build the
//! common ones.
//!
//! A [`Predicate`] is the atom of a pattern: an arbitrary test over one
//! value of the input sequence. Every predicate receives the value under
//! inspection plus a read-only [`MatchContext`] giving it the values
//! matched so far, the whole input, and the current position — the
//! information a context-sensitive predicate (a break condition, a
//! "different from the last match" test) needs. Simple value-only tests
//! are adapted via [`Predicate::value`].
//!
//! The factory functions here ([`value_eq`], [`value_in`], [`present`],
//! [`match_regexp`], …) construct the predicates the
//! [`PatternBuilder`](crate::PatternBuilder) methods of the same names
//! append.

use std::borrow::Cow;
use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;

use regex::Regex;

/// Shared evaluator signature: the value under test plus its context.
type EvalFn<T> = dyn Fn(&T, &MatchContext<'_, T>) -> bool + Send + Sync;

/// A test over one value of the input sequence.
///
/// Cheap to clone (shared behind an [`Arc`]), so one predicate can back
/// several sub-patterns. Predicates are assumed pure: the engine may
/// evaluate them in any order and any number of times while exploring
/// candidate matches.
pub struct Predicate<T> {
    eval: Arc<EvalFn<T>>,
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl<T> Predicate<T> {
    /// Wraps a full-context evaluator `(value, context) -> bool`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T, &MatchContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        Self { eval: Arc::new(f) }
    }

    /// Wraps a value-only test, ignoring the context.
    pub fn value<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::new(move |v, _| f(v))
    }

    /// Evaluates the predicate.
    pub(crate) fn eval(&self, value: &T, ctx: &MatchContext<'_, T>) -> bool {
        (self.eval)(value, ctx)
    }
}

/// Read-only view of the match in progress, passed to every predicate.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a, T> {
    values: &'a [T],
    matched: &'a [usize],
    position: usize,
}

impl<'a, T> MatchContext<'a, T> {
    pub(crate) fn new(values: &'a [T], matched: &'a [usize], position: usize) -> Self {
        Self {
            values,
            matched,
            position,
        }
    }

    /// Index of the value currently under test.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The entire input sequence.
    #[must_use]
    pub const fn values(&self) -> &'a [T] {
        self.values
    }

    /// Values matched so far, in input order across all sub-patterns.
    pub fn matched(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.matched.iter().map(|&i| &self.values[i])
    }

    /// Number of values matched so far.
    #[must_use]
    pub const fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// The most recently matched value, if any.
    #[must_use]
    pub fn last_matched(&self) -> Option<&'a T> {
        self.matched.last().map(|&i| &self.values[i])
    }
}

/// Whether a value counts as "present".
///
/// The strict reading: a value is absent iff it is null-like (`None`) or
/// equal to the empty string. Empty collections are deliberately NOT
/// absent; implement this trait for your own types if you want a wider
/// notion.
pub trait Presence {
    /// True if the value is present under the strict reading above.
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Cow<'_, str> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<P: Presence + ?Sized> Presence for &P {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<P: Presence> Presence for Option<P> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

macro_rules! always_present {
    ($($ty:ty),+ $(,)?) => {$(
        impl Presence for $ty {
            fn is_present(&self) -> bool {
                true
            }
        }
    )+};
}

always_present!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/// Matches any value.
#[must_use]
pub fn any<T: 'static>() -> Predicate<T> {
    Predicate::new(|_, _| true)
}

/// Matches values equal to `expected`.
#[must_use]
pub fn value_eq<T>(expected: T) -> Predicate<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    Predicate::value(move |v| *v == expected)
}

/// Matches values not equal to `unexpected`.
#[must_use]
pub fn value_neq<T>(unexpected: T) -> Predicate<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    Predicate::value(move |v| *v != unexpected)
}

/// Matches values inside `range` (any range shape, e.g. `2..5` or `2..=9`).
#[must_use]
pub fn value_in<T, R>(range: R) -> Predicate<T>
where
    T: PartialOrd + Send + Sync + 'static,
    R: RangeBounds<T> + Send + Sync + 'static,
{
    Predicate::value(move |v| range.contains(v))
}

/// Matches values for which `test` returns true.
///
/// The conventional spelling of a type or variant check over a
/// heterogeneous value enum:
///
/// ```
/// # #[derive(PartialEq)] enum Value { Int(i64), Text(String) }
/// let is_int = seqmatch::predicate::value_of(|v: &Value| matches!(v, Value::Int(_)));
/// ```
#[must_use]
pub fn value_of<T, F>(test: F) -> Predicate<T>
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Predicate::value(test)
}

/// Matches present values (see [`Presence`]).
#[must_use]
pub fn present<T>() -> Predicate<T>
where
    T: Presence + 'static,
{
    Predicate::value(Presence::is_present)
}

/// Matches absent values: null-like or the empty string.
#[must_use]
pub fn absent<T>() -> Predicate<T>
where
    T: Presence + 'static,
{
    Predicate::value(|v: &T| !v.is_present())
}

/// Matches string-like values against a compiled regular expression.
#[must_use]
pub fn match_regexp<T>(re: Regex) -> Predicate<T>
where
    T: AsRef<str> + 'static,
{
    Predicate::value(move |v: &T| re.is_match(v.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a, T>(values: &'a [T], matched: &'a [usize], position: usize) -> MatchContext<'a, T> {
        MatchContext::new(values, matched, position)
    }

    #[test]
    fn test_value_eq() {
        let p = value_eq(3);
        let values = [1, 3];
        assert!(!p.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(p.eval(&values[1], &ctx(&values, &[], 1)));
    }

    #[test]
    fn test_value_neq() {
        let p = value_neq("a");
        let values = ["a", "b"];
        assert!(!p.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(p.eval(&values[1], &ctx(&values, &[], 1)));
    }

    #[test]
    fn test_value_in_half_open_and_inclusive() {
        let values = [1, 2, 5, 9, 10];
        let half_open = value_in(2..5);
        assert!(!half_open.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(half_open.eval(&values[1], &ctx(&values, &[], 1)));
        assert!(!half_open.eval(&values[2], &ctx(&values, &[], 2)));

        let inclusive = value_in(2..=9);
        assert!(inclusive.eval(&values[3], &ctx(&values, &[], 3)));
        assert!(!inclusive.eval(&values[4], &ctx(&values, &[], 4)));
    }

    #[test]
    fn test_value_of_variant_check() {
        #[derive(Debug)]
        enum Value {
            Int(i64),
            Text(&'static str),
        }
        let is_int = value_of(|v: &Value| matches!(v, Value::Int(_)));
        let values = [Value::Int(1), Value::Text("x")];
        assert!(is_int.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(!is_int.eval(&values[1], &ctx(&values, &[], 1)));
    }

    #[test]
    fn test_any_matches_everything() {
        let p = any::<i32>();
        let values = [i32::MIN, 0, i32::MAX];
        for (i, v) in values.iter().enumerate() {
            assert!(p.eval(v, &ctx(&values, &[], i)));
        }
    }

    #[test]
    fn test_presence_strings() {
        assert!("x".is_present());
        assert!(!"".is_present());
        assert!(String::from("x").is_present());
        assert!(!String::new().is_present());
        assert!(Cow::Borrowed("x").is_present());
    }

    #[test]
    fn test_presence_options() {
        assert!(Some("x").is_present());
        assert!(!Some("").is_present());
        assert!(!None::<&str>.is_present());
        assert!(Some(0_i64).is_present());
    }

    #[test]
    fn test_presence_numbers_always_present() {
        assert!(0_i32.is_present());
        assert!(0.0_f64.is_present());
        assert!(false.is_present());
    }

    #[test]
    fn test_present_and_absent_predicates() {
        let values = [Some("a"), Some(""), None];
        let pres = present::<Option<&str>>();
        let abs = absent::<Option<&str>>();
        assert!(pres.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(!pres.eval(&values[1], &ctx(&values, &[], 1)));
        assert!(abs.eval(&values[1], &ctx(&values, &[], 1)));
        assert!(abs.eval(&values[2], &ctx(&values, &[], 2)));
    }

    #[test]
    fn test_match_regexp() {
        let re = Regex::new(r"^\d+$").unwrap();
        let p = match_regexp::<&str>(re);
        let values = ["123", "12a"];
        assert!(p.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(!p.eval(&values[1], &ctx(&values, &[], 1)));
    }

    #[test]
    fn test_context_accessors() {
        let values = [10, 20, 30, 40];
        let matched = [0, 2];
        let c = ctx(&values, &matched, 3);
        assert_eq!(c.position(), 3);
        assert_eq!(c.values(), &values);
        assert_eq!(c.matched_count(), 2);
        assert_eq!(c.matched().copied().collect::<Vec<_>>(), vec![10, 30]);
        assert_eq!(c.last_matched(), Some(&30));
    }

    #[test]
    fn test_context_empty_matched() {
        let values = [1];
        let c = ctx(&values, &[], 0);
        assert_eq!(c.matched_count(), 0);
        assert_eq!(c.last_matched(), None);
    }

    #[test]
    fn test_context_sensitive_predicate() {
        // Matches only values strictly greater than the last matched one.
        let ascending = Predicate::new(|v: &i32, c: &MatchContext<'_, i32>| {
            c.last_matched().map_or(true, |last| v > last)
        });
        let values = [5, 3, 9];
        assert!(ascending.eval(&values[0], &ctx(&values, &[], 0)));
        assert!(!ascending.eval(&values[1], &ctx(&values, &[0], 1)));
        assert!(ascending.eval(&values[2], &ctx(&values, &[0], 2)));
    }

    #[test]
    fn test_predicate_clone_shares_evaluator() {
        let p = value_eq(7);
        let q = p.clone();
        let values = [7];
        assert!(q.eval(&values[0], &ctx(&values, &[], 0)));
    }
}
