//! Failed-login rate limiter.
//!
//! Three 401 replies from one host within 20 seconds put that host in a
//! 5-minute block; every request it makes while blocked is reported.
//!
//! Both per-host maps are cleaned up lazily: a stale failure window or a
//! lapsed block is corrected the next time the same host appears, never by
//! sweeping. Memory is bounded by the number of distinct offending hosts,
//! not by stream length.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

/// Failures within this span count toward one streak.
pub const FAILURE_WINDOW_SECS: i64 = 20;

/// Failures needed to trigger a block.
pub const FAILURE_THRESHOLD: u32 = 3;

/// How long a block lasts, measured from the third failure.
pub const BLOCK_SECS: i64 = 5 * 60;

/// Reply code counted as an authentication failure.
const FAILED_LOGIN_CODE: &str = "401";

/// An open failure-counting window for one host.
#[derive(Debug, Clone, Copy)]
struct FailureStreak {
    /// First failure of the current streak
    window_start: NaiveDateTime,
    /// Failures inside the window so far (1 or 2 while live)
    count: u32,
}

/// Classification of one record against the block state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not blocked; nothing to report
    Allowed,
    /// Inside an active block; the raw line goes to the blocked report
    Blocked,
}

impl Verdict {
    /// Check if this record must be appended to the blocked report.
    #[must_use]
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

/// Per-host failed-login state machine: Clear → Accumulating → Blocked.
#[derive(Debug, Default)]
pub struct RateLimiter {
    /// Hosts inside an open failure window
    failures: HashMap<String, FailureStreak>,
    /// Blocked hosts, keyed to the third failure's timestamp
    blocks: HashMap<String, NaiveDateTime>,
    /// Total records classified as blocked (for stats)
    total_blocked: u64,
}

impl RateLimiter {
    /// Create a limiter with no tracked hosts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one record and update the host's state.
    ///
    /// A record at exactly `block_start + 5min` is still blocked. A lapsed
    /// block is removed here and the same record then goes through failure
    /// accounting, so a block does not shield a fresh streak.
    pub fn observe(&mut self, host: &str, ts: NaiveDateTime, reply_code: &str) -> Verdict {
        if let Some(&block_start) = self.blocks.get(host) {
            if ts <= block_start + Duration::seconds(BLOCK_SECS) {
                self.total_blocked += 1;
                return Verdict::Blocked;
            }
            self.blocks.remove(host);
        }

        if reply_code == FAILED_LOGIN_CODE {
            self.record_failure(host, ts);
        }

        Verdict::Allowed
    }

    /// Count of hosts currently carrying any state (live or stale).
    #[must_use]
    pub fn tracked_hosts(&self) -> usize {
        self.failures.len() + self.blocks.len()
    }

    /// Total records classified as blocked.
    #[must_use]
    pub fn total_blocked(&self) -> u64 {
        self.total_blocked
    }

    fn record_failure(&mut self, host: &str, ts: NaiveDateTime) {
        let fresh = FailureStreak { window_start: ts, count: 1 };

        match self.failures.get_mut(host) {
            None => {
                self.failures.insert(host.to_string(), fresh);
            }
            Some(streak) => {
                if ts > streak.window_start + Duration::seconds(FAILURE_WINDOW_SECS) {
                    // Window expired: the counter resets atomically to 1,
                    // it never carries over from the old window.
                    *streak = fresh;
                } else {
                    streak.count += 1;
                    if streak.count >= FAILURE_THRESHOLD {
                        self.failures.remove(host);
                        self.blocks.insert(host.to_string(), ts);
                    }
                }
            }
        }
    }
}
