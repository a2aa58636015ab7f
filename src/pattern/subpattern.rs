//! One atom of a pattern: a predicate plus its match-modifier flags.

use std::fmt;

use crate::predicate::{MatchContext, Predicate};

/// A single step of a [`Pattern`](crate::Pattern).
///
/// Pairs an evaluator predicate with the flags controlling how the
/// engine may apply it: whether it can match zero elements
/// (`optional`), one or more consecutive elements (`repeat`), whether
/// its group appears in the result (`capture`), and whether
/// non-matching elements before it may be skipped (`allow_gaps`,
/// bounded by an optional break condition).
pub struct SubPattern<T> {
    evaluator: Predicate<T>,
    optional: bool,
    repeat: bool,
    capture: bool,
    allow_gaps: bool,
    gap_break: Option<Predicate<T>>,
    name: Option<String>,
}

impl<T> fmt::Debug for SubPattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubPattern")
            .field("optional", &self.optional)
            .field("repeat", &self.repeat)
            .field("capture", &self.capture)
            .field("allow_gaps", &self.allow_gaps)
            .field("gap_break", &self.gap_break.is_some())
            .field("name", &self.name)
            .finish()
    }
}

impl<T> SubPattern<T> {
    /// Creates a sub-pattern from an evaluator, resolving the tri-state
    /// defaults of the enclosing option scope at add time. The scope is
    /// snapshotted here, never consulted again at match time.
    pub(crate) fn new(evaluator: Predicate<T>, scope: &Options<T>) -> Self {
        Self {
            evaluator,
            optional: scope.optional.unwrap_or(false),
            repeat: scope.repeat.unwrap_or(false),
            capture: scope.capture.unwrap_or(true),
            allow_gaps: scope.allow_gaps.unwrap_or(false),
            gap_break: scope.gap_break.clone(),
            name: None,
        }
    }

    /// Whether this sub-pattern may match zero elements.
    #[must_use]
    pub const fn optional(&self) -> bool {
        self.optional
    }

    /// Whether this sub-pattern may match more than one consecutive element.
    #[must_use]
    pub const fn repeat(&self) -> bool {
        self.repeat
    }

    /// Whether this sub-pattern's group appears in match results.
    #[must_use]
    pub const fn capture(&self) -> bool {
        self.capture
    }

    /// Whether non-matching elements before this sub-pattern may be skipped.
    #[must_use]
    pub const fn allow_gaps(&self) -> bool {
        self.allow_gaps
    }

    /// Whether a gap break condition is configured.
    #[must_use]
    pub const fn has_gap_break(&self) -> bool {
        self.gap_break.is_some()
    }

    /// The sub-pattern's name, if one was assigned.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluates the predicate against one value.
    pub(crate) fn matches(&self, value: &T, ctx: &MatchContext<'_, T>) -> bool {
        self.evaluator.eval(value, ctx)
    }

    /// True if gap-skipping must stop at this value. Always false when
    /// no break condition is configured.
    pub(crate) fn gap_breaks_at(&self, value: &T, ctx: &MatchContext<'_, T>) -> bool {
        self.gap_break.as_ref().is_some_and(|p| p.eval(value, ctx))
    }

    /// Applies the set fields of `opts` to this sub-pattern's flags.
    /// Names are handled by the builder, which owns uniqueness.
    pub(crate) fn apply(&mut self, opts: &Options<T>) {
        if let Some(optional) = opts.optional {
            self.optional = optional;
        }
        if let Some(repeat) = opts.repeat {
            self.repeat = repeat;
        }
        if let Some(capture) = opts.capture {
            self.capture = capture;
        }
        if let Some(allow_gaps) = opts.allow_gaps {
            self.allow_gaps = allow_gaps;
        }
        if let Some(gap_break) = &opts.gap_break {
            self.gap_break = Some(gap_break.clone());
        }
    }

    pub(crate) fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    pub(crate) fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub(crate) fn set_capture(&mut self, capture: bool) {
        self.capture = capture;
    }

    pub(crate) fn set_allow_gaps(&mut self, allow_gaps: bool) {
        self.allow_gaps = allow_gaps;
    }

    pub(crate) fn set_gap_break(&mut self, gap_break: Predicate<T>) {
        self.gap_break = Some(gap_break);
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }
}

/// A set of sub-pattern options where `None` means "inherit".
///
/// Used three ways: as the scoped defaults pushed by
/// [`PatternBuilder::with_options`](crate::PatternBuilder::with_options),
/// as the retroactive update applied by
/// [`PatternBuilder::set_options_for`](crate::PatternBuilder::set_options_for),
/// and as the one-shot tweak of
/// [`PatternBuilder::with`](crate::PatternBuilder::with).
pub struct Options<T> {
    pub(crate) optional: Option<bool>,
    pub(crate) repeat: Option<bool>,
    pub(crate) capture: Option<bool>,
    pub(crate) allow_gaps: Option<bool>,
    pub(crate) gap_break: Option<Predicate<T>>,
    pub(crate) name: Option<String>,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            optional: None,
            repeat: None,
            capture: None,
            allow_gaps: None,
            gap_break: None,
            name: None,
        }
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        Self {
            optional: self.optional,
            repeat: self.repeat,
            capture: self.capture,
            allow_gaps: self.allow_gaps,
            gap_break: self.gap_break.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("optional", &self.optional)
            .field("repeat", &self.repeat)
            .field("capture", &self.capture)
            .field("allow_gaps", &self.allow_gaps)
            .field("gap_break", &self.gap_break.is_some())
            .field("name", &self.name)
            .finish()
    }
}

impl<T> Options<T> {
    /// An empty option set: every field inherits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `optional` flag.
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    /// Sets the `repeat` flag.
    #[must_use]
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Sets the `capture` flag.
    #[must_use]
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Sets the `allow_gaps` flag.
    #[must_use]
    pub fn allow_gaps(mut self, allow_gaps: bool) -> Self {
        self.allow_gaps = Some(allow_gaps);
        self
    }

    /// Sets the gap break condition.
    #[must_use]
    pub fn break_when(mut self, gap_break: Predicate<T>) -> Self {
        self.gap_break = Some(gap_break);
        self
    }

    /// Sets the sub-pattern name.
    ///
    /// Meaningful for [`set_options_for`](crate::PatternBuilder::set_options_for)
    /// and [`with`](crate::PatternBuilder::with); names are never
    /// inherited through option scopes.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolves `self` over an outer scope: set fields win, unset fields
    /// fall back to `base`. Names do not flow through scopes.
    pub(crate) fn or_inherit(&self, base: &Self) -> Self {
        Self {
            optional: self.optional.or(base.optional),
            repeat: self.repeat.or(base.repeat),
            capture: self.capture.or(base.capture),
            allow_gaps: self.allow_gaps.or(base.allow_gaps),
            gap_break: self.gap_break.clone().or_else(|| base.gap_break.clone()),
            name: None,
        }
    }
}
