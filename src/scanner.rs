//! Cursor-based scanning: applying one pattern repeatedly along a
//! sequence.
//!
//! [`Scanner`] walks a borrowed slice; [`StreamScanner`] does the same
//! over a lazy, restartable iterator. Both advance their cursor only on
//! a successful match, so callers can interleave [`scan`](Scanner::scan)
//! (try here) and [`scan_until`](Scanner::scan_until) (skip ahead to
//! the next match) to tokenize a sequence into non-overlapping matches.
//!
//! Scanners are single-threaded by design: they own a mutable cursor.
//! Use one scanner per thread over the same shared [`Pattern`].

use tracing::debug;

use crate::pattern::{Match, Pattern};

/// Walks a borrowed sequence, applying patterns at the cursor.
#[derive(Debug, Clone)]
pub struct Scanner<'a, T> {
    values: &'a [T],
    pos: usize,
}

impl<'a, T> Scanner<'a, T> {
    /// A scanner positioned at the start of `values`.
    #[must_use]
    pub const fn new(values: &'a [T]) -> Self {
        Self { values, pos: 0 }
    }

    /// True once the cursor has passed the last value.
    #[must_use]
    pub const fn eov(&self) -> bool {
        self.pos >= self.values.len()
    }

    /// Moves the cursor back to the start. Idempotent.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Current cursor position.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// The values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a [T] {
        &self.values[self.pos..]
    }

    /// Attempts a match at the cursor. On success the cursor advances
    /// just past the match; on a miss it stays put.
    pub fn scan(&mut self, pattern: &Pattern<T>) -> Option<Match<T>>
    where
        T: Clone,
    {
        let (m, next_pos) = pattern.captures_real(self.remaining())?;
        self.pos += next_pos;
        Some(m)
    }

    /// Tries successive start positions from the cursor until the
    /// pattern matches, then consumes through that match. On a miss the
    /// cursor stays put.
    pub fn scan_until(&mut self, pattern: &Pattern<T>) -> Option<Match<T>>
    where
        T: Clone,
    {
        for start in self.pos..self.values.len() {
            if let Some((m, next_pos)) = pattern.captures_real(&self.values[start..]) {
                debug!(skipped = start - self.pos, "scan_until matched after skip-ahead");
                self.pos = start + next_pos;
                return Some(m);
            }
        }
        None
    }
}

/// Walks a lazy, restartable sequence of values.
///
/// Values are pulled from the iterator on demand: [`eov`](Self::eov)
/// peeks exactly one element ahead, while scanning materializes the
/// remaining input first (greedy longest-match cannot be decided
/// without seeing the tail). [`reset`](Self::reset) restarts from a
/// clone of the original iterator, which is why `I: Clone` is required.
pub struct StreamScanner<I: Iterator> {
    source: I,
    iter: I,
    buf: Vec<I::Item>,
    pos: usize,
    exhausted: bool,
}

impl<I> StreamScanner<I>
where
    I: Iterator + Clone,
{
    /// A stream scanner over `iter`.
    pub fn new(iter: I) -> Self {
        Self {
            source: iter.clone(),
            iter,
            buf: Vec::new(),
            pos: 0,
            exhausted: false,
        }
    }

    fn pull_one(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.iter.next() {
            Some(value) => {
                self.buf.push(value);
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    fn pull_all(&mut self) {
        while self.pull_one() {}
    }

    /// True once the stream has no value left at the cursor. Pulls at
    /// most one element ahead to find out.
    pub fn eov(&mut self) -> bool {
        !(self.pos < self.buf.len() || self.pull_one())
    }

    /// Restarts from the beginning of the original sequence. Idempotent.
    pub fn reset(&mut self) {
        self.iter = self.source.clone();
        self.buf.clear();
        self.pos = 0;
        self.exhausted = false;
    }

    /// Current cursor position within the stream.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Attempts a match at the cursor, like [`Scanner::scan`].
    pub fn scan(&mut self, pattern: &Pattern<I::Item>) -> Option<Match<I::Item>>
    where
        I::Item: Clone,
    {
        self.pull_all();
        let (m, next_pos) = pattern.captures_real(&self.buf[self.pos..])?;
        self.pos += next_pos;
        Some(m)
    }

    /// Skips ahead to the next match, like [`Scanner::scan_until`].
    pub fn scan_until(&mut self, pattern: &Pattern<I::Item>) -> Option<Match<I::Item>>
    where
        I::Item: Clone,
    {
        self.pull_all();
        for start in self.pos..self.buf.len() {
            if let Some((m, next_pos)) = pattern.captures_real(&self.buf[start..]) {
                debug!(skipped = start - self.pos, "scan_until matched after skip-ahead");
                self.pos = start + next_pos;
                return Some(m);
            }
        }
        None
    }
}
