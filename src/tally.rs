//! Frequency counters with a bounded top-K query.
//!
//! Two instances run per pass: host → request count and resource → byte sum.

use std::collections::HashMap;

/// A key → running-total map with a top-K query.
#[derive(Debug, Default)]
pub struct Tally {
    totals: HashMap<String, u64>,
}

impl Tally {
    /// Create an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `key`'s running total, inserting the key if new.
    pub fn add(&mut self, key: &str, amount: u64) {
        if let Some(total) = self.totals.get_mut(key) {
            *total += amount;
        } else {
            self.totals.insert(key.to_string(), amount);
        }
    }

    /// The `k` largest totals, value descending, key ascending on ties.
    #[must_use]
    pub fn top(&self, k: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .totals
            .iter()
            .map(|(key, total)| (key.clone(), *total))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(k);
        entries
    }

    /// Number of distinct keys seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Check if no keys have been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
