// SPDX-License-Identifier: MIT

//! Backtracking search engine for pattern matching.
//!
//! Explores a non-deterministic state space of (sub-pattern index,
//! value index, captured groups) tuples breadth-first, scoring every
//! candidate final state and keeping the best one: the match consuming
//! the most input, ties broken by total captured element count. This
//! realises greedy longest-match semantics without compiling the
//! pattern to an automaton.
//!
//! # State expansion
//!
//! Each dequeued state evaluates the current sub-pattern against the
//! current value and enqueues up to four successors:
//!
//! 1. repeat — stay on the sub-pattern, consume the matching value;
//! 2. gap — stay on the sub-pattern, skip a non-matching value;
//! 3. advance — move to the next sub-pattern, consume the value;
//! 4. skip — move past an optional sub-pattern without consuming.
//!
//! The queue is FIFO and rules fire in the order above, which pins down
//! which of several equally-scored matches wins a tie.
//!
//! # Bounds
//!
//! Exact-duplicate states are dropped (diamond paths through the rules
//! reconverge constantly), and total expansion is capped by a budget
//! proportional to `|values| * |sub-patterns|`. When the budget runs
//! out the search stops and reports the best match found so far.

use std::collections::{HashSet, VecDeque};

use tracing::{trace, warn};

use crate::pattern::Pattern;
use crate::predicate::MatchContext;

/// Floor for the state expansion budget, so tiny inputs with ambiguous
/// patterns still get a thorough search.
const MIN_STATE_BUDGET: usize = 4096;

/// Budget per (sub-pattern, value) cell. Well-formed patterns stay far
/// below this; ambiguous nested repetition hits it instead of running
/// away.
const STATES_PER_CELL: usize = 8;

/// A winning assignment of input values to sub-patterns.
///
/// `groups` holds input indices, one group per sub-pattern (padded with
/// empty groups for trailing optional sub-patterns the match never
/// reached). Capture projection happens later, in [`Pattern`].
pub(crate) struct SearchWin {
    pub groups: Vec<Vec<usize>>,
    pub next_pos: usize,
}

/// One state of the non-deterministic search.
///
/// Groups are stored flattened: `flat` is every matched input index in
/// order, `lens` the group sizes splitting it. `lens.len()` is either
/// `sp` (current group not started) or `sp + 1` (started), which keeps
/// states small and makes duplicate detection a plain hash lookup.
#[derive(Clone, PartialEq, Eq, Hash)]
struct SearchState {
    sp: usize,
    vp: usize,
    prev_sp: Option<usize>,
    prev_matched: bool,
    flat: Vec<usize>,
    lens: Vec<usize>,
}

struct BestWin {
    flat: Vec<usize>,
    lens: Vec<usize>,
    next_pos: usize,
    total: usize,
}

fn state_budget(subpatterns: usize, values: usize) -> usize {
    MIN_STATE_BUDGET.max(STATES_PER_CELL.saturating_mul(subpatterns).saturating_mul(values))
}

fn enqueue(queue: &mut VecDeque<SearchState>, seen: &mut HashSet<SearchState>, state: SearchState) {
    if seen.insert(state.clone()) {
        queue.push_back(state);
    }
}

/// Runs the search. Returns the best normal match, or `None` when no
/// sub-pattern assignment matches (the all-optional degenerate case is
/// the caller's concern).
pub(crate) fn search<T>(pattern: &Pattern<T>, values: &[T]) -> Option<SearchWin> {
    let subs = pattern.subpatterns();
    if subs.is_empty() || values.is_empty() {
        return None;
    }

    let budget = state_budget(subs.len(), values.len());
    let mut queue = VecDeque::new();
    let mut seen = HashSet::new();
    enqueue(
        &mut queue,
        &mut seen,
        SearchState {
            sp: 0,
            vp: 0,
            prev_sp: None,
            prev_matched: false,
            flat: Vec::new(),
            lens: vec![0],
        },
    );

    let mut best: Option<BestWin> = None;
    let mut expanded = 0_usize;

    while let Some(st) = queue.pop_front() {
        if st.vp >= values.len() {
            continue;
        }
        expanded += 1;
        if expanded > budget {
            warn!(expanded, budget, "state budget exhausted, keeping best match found so far");
            break;
        }

        let sub = &subs[st.sp];
        let value = &values[st.vp];
        let ctx = MatchContext::new(values, &st.flat, st.vp);
        let matched = sub.matches(value, &ctx);
        let broke = sub.gap_breaks_at(value, &ctx);
        let gaps = sub.allow_gaps() && !broke;
        let prev_self = st.prev_sp.map_or(true, |p| p == st.sp);
        let started = st.lens.len() == st.sp + 1;
        let last = st.sp + 1 == subs.len();

        // Groups with the current value appended to the current
        // sub-pattern's group (opening it if necessary).
        let appended = if matched {
            let mut flat = Vec::with_capacity(st.flat.len() + 1);
            flat.extend_from_slice(&st.flat);
            flat.push(st.vp);
            let mut lens = st.lens.clone();
            if started {
                if let Some(count) = lens.last_mut() {
                    *count += 1;
                }
            } else {
                lens.push(1);
            }
            Some((flat, lens))
        } else {
            None
        };

        // Candidate final state: the value matched and no mandatory
        // sub-pattern remains ahead.
        if let Some((flat, lens)) = &appended {
            if pattern.last_mandatory().map_or(true, |i| st.sp >= i) {
                let next_pos = st.vp + 1;
                let total = flat.len();
                let better = best.as_ref().map_or(true, |b| {
                    next_pos > b.next_pos || (next_pos == b.next_pos && total > b.total)
                });
                if better {
                    best = Some(BestWin {
                        flat: flat.clone(),
                        lens: lens.clone(),
                        next_pos,
                        total,
                    });
                }
            }
        }

        // Rule 1: repeat — stay on this sub-pattern, consume the value.
        if sub.repeat() {
            if let Some((flat, lens)) = &appended {
                enqueue(
                    &mut queue,
                    &mut seen,
                    SearchState {
                        sp: st.sp,
                        vp: st.vp + 1,
                        prev_sp: Some(st.sp),
                        prev_matched: true,
                        flat: flat.clone(),
                        lens: lens.clone(),
                    },
                );
            }
        }

        // Rule 2: gap — skip a non-matching value, either under this
        // sub-pattern's own allowance or the previous one's (as long as
        // its break condition stays quiet).
        if !matched {
            let prev_allows = st.prev_sp.is_some_and(|p| {
                let prev = &subs[p];
                prev.allow_gaps() && !prev.gap_breaks_at(value, &ctx)
            });
            if gaps || prev_allows {
                enqueue(
                    &mut queue,
                    &mut seen,
                    SearchState {
                        sp: st.sp,
                        vp: st.vp + 1,
                        prev_sp: st.prev_sp,
                        prev_matched: true,
                        flat: st.flat.clone(),
                        lens: st.lens.clone(),
                    },
                );
            }
        }

        // Rule 3: advance — move to the next sub-pattern, consuming the
        // value. A non-matching value may be consumed as a trailing gap,
        // but only once this sub-pattern has matched something: without
        // that, a mandatory sub-pattern could be silently bypassed.
        let gap_advance = !matched && gaps && st.prev_sp == Some(st.sp);
        if !last && (matched || gap_advance) && !(sub.optional() && !matched) {
            let (flat, lens) = match &appended {
                Some((flat, lens)) => (flat.clone(), lens.clone()),
                None => (st.flat.clone(), st.lens.clone()),
            };
            enqueue(
                &mut queue,
                &mut seen,
                SearchState {
                    sp: st.sp + 1,
                    vp: st.vp + 1,
                    prev_sp: Some(st.sp),
                    prev_matched: true,
                    flat,
                    lens,
                },
            );
        }

        // Rule 4: skip — move past an optional sub-pattern without
        // consuming, unless it just matched.
        if sub.optional() && !last && !(prev_self && st.prev_matched) {
            let mut lens = st.lens.clone();
            if !started {
                lens.push(0);
            }
            enqueue(
                &mut queue,
                &mut seen,
                SearchState {
                    sp: st.sp + 1,
                    vp: st.vp,
                    prev_sp: Some(st.sp),
                    prev_matched: false,
                    flat: st.flat.clone(),
                    lens,
                },
            );
        }
    }

    trace!(expanded, matched = best.is_some(), "search finished");

    best.map(|b| {
        let mut groups = Vec::with_capacity(subs.len());
        let mut offset = 0;
        for &n in &b.lens {
            groups.push(b.flat[offset..offset + n].to_vec());
            offset += n;
        }
        while groups.len() < subs.len() {
            groups.push(Vec::new());
        }
        SearchWin {
            groups,
            next_pos: b.next_pos,
        }
    })
}
