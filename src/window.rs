//! Sliding-window busiest-period tracker.
//!
//! Maintains exactly one live 60-minute window over the timestamp stream and
//! a bounded top-K collection of finalized window counts. The window is
//! evaluated at every one-second-aligned start, not just hour boundaries, so
//! the tracker slides its boundary incrementally instead of re-scanning:
//! O(1) amortized per elapsed second plus O(log K) per finalized window.
//!
//! Precondition carried by the whole pipeline: timestamps arrive in
//! non-decreasing order. Violations are not detected.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use chrono::{Duration, NaiveDateTime};

/// Number of busiest windows retained by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Window width in seconds (60 minutes).
pub const WINDOW_WIDTH_SECS: i64 = 3600;

/// A finalized window: its start and how many records fell inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// First second of the window
    pub start: NaiveDateTime,
    /// Records with timestamps in `[start, start + width - 1]`
    pub count: u64,
}

/// Tracks the K busiest fixed-width windows over a non-decreasing
/// timestamp stream.
///
/// Construct only once the first timestamp is known; an empty stream never
/// builds a tracker.
#[derive(Debug)]
pub struct BusyWindowTracker {
    /// Timestamps inside the live window (oldest at front)
    members: VecDeque<NaiveDateTime>,
    /// Bounded top-K of finalized windows. Max-heap on
    /// `(Reverse(count), start)`, so the root is the eviction candidate:
    /// lowest count, latest start among equal counts. Evicting the latest
    /// tie keeps the earliest-started window of any given count.
    top: BinaryHeap<(Reverse<u64>, NaiveDateTime)>,
    /// Live window start (inclusive)
    start: NaiveDateTime,
    /// Live window end (inclusive), `start + width - 1`
    end: NaiveDateTime,
    /// Window width in seconds
    width: i64,
    /// Retention bound K
    top_n: usize,
    /// Total timestamps observed (for stats)
    total_observed: u64,
}

impl BusyWindowTracker {
    /// Create a tracker whose first window starts at `first`.
    #[must_use]
    pub fn new(first: NaiveDateTime, top_n: usize) -> Self {
        Self::with_width(first, top_n, WINDOW_WIDTH_SECS)
    }

    /// Create a tracker with an explicit window width in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `width_secs` is not positive.
    #[must_use]
    pub fn with_width(first: NaiveDateTime, top_n: usize, width_secs: i64) -> Self {
        assert!(width_secs > 0, "window width must be positive");

        Self {
            members: VecDeque::new(),
            top: BinaryHeap::with_capacity(top_n + 1),
            start: first,
            end: first + Duration::seconds(width_secs - 1),
            width: width_secs,
            top_n,
            total_observed: 0,
        }
    }

    /// Feed the next timestamp. Must be ≥ every previously observed
    /// timestamp; out-of-order input is undefined behavior, not an error.
    pub fn observe(&mut self, ts: NaiveDateTime) {
        debug_assert!(
            self.members.back().is_none_or(|&m| m <= ts),
            "timestamps must be non-decreasing"
        );

        self.total_observed += 1;

        // Slide until the live window reaches the new timestamp, finalizing
        // each start position left behind.
        while self.end < ts {
            self.finalize_live();
            self.advance_one_second();

            // Gap skip: with the deque drained and the top-K full, every
            // window until ts has count 0 and cannot displace an entry
            // (displacement requires strictly exceeding the minimum), so no
            // skipped boundary could finalize a winner.
            if self.members.is_empty() && self.top.len() >= self.top_n {
                let target = ts - Duration::seconds(self.width - 1);
                if target > self.start {
                    self.start = target;
                    self.end = ts;
                }
            }
        }

        self.members.push_back(ts);
    }

    /// Consume the tracker after the stream ends, flushing every trailing
    /// window that still holds a member, and return the retained windows
    /// ordered by count descending then start ascending.
    ///
    /// Later starts past the last member would only be strictly worse or
    /// empty, so the flush stops once the deque drains.
    #[must_use]
    pub fn finish(mut self) -> Vec<WindowCount> {
        while !self.members.is_empty() {
            self.finalize_live();
            self.start += Duration::seconds(1);
            self.drop_stale();
        }

        let mut result: Vec<WindowCount> = self
            .top
            .into_vec()
            .into_iter()
            .map(|(Reverse(count), start)| WindowCount { start, count })
            .collect();
        result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.start.cmp(&b.start)));
        result
    }

    /// Record count of the live window.
    #[must_use]
    pub fn live_count(&self) -> u64 {
        self.members.len() as u64
    }

    /// Start of the live window.
    #[must_use]
    pub fn live_start(&self) -> NaiveDateTime {
        self.start
    }

    /// Total timestamps observed.
    #[must_use]
    pub fn total_observed(&self) -> u64 {
        self.total_observed
    }

    /// Push the live window into the top-K, evicting the current minimum
    /// when full and strictly beaten.
    fn finalize_live(&mut self) {
        let count = self.members.len() as u64;

        if self.top.len() < self.top_n {
            self.top.push((Reverse(count), self.start));
        } else if let Some(&(Reverse(min_count), _)) = self.top.peek() {
            if count > min_count {
                self.top.pop();
                self.top.push((Reverse(count), self.start));
            }
        }

        debug_assert!(self.top.len() <= self.top_n);
    }

    /// Shift both window boundaries forward by one second and drop members
    /// that fell off the front.
    fn advance_one_second(&mut self) {
        self.start += Duration::seconds(1);
        self.end += Duration::seconds(1);
        self.drop_stale();
    }

    /// Pop members now older than the window start.
    fn drop_stale(&mut self) {
        while let Some(&front) = self.members.front() {
            if front < self.start {
                self.members.pop_front();
            } else {
                break;
            }
        }
    }
}
