use serde::{Deserialize, Serialize};

/// Running totals attached to every parsed row.
///
/// `count` is the number of data rows seen so far and `amount` the sum of
/// the UTF-8 byte lengths of their raw lines (newlines excluded). Both only
/// ever grow over the lifetime of one engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub count: u64,
    pub amount: u64,
}

impl Stats {
    #[must_use]
    pub fn new(count: u64, amount: u64) -> Self {
        Self { count, amount }
    }

    /// Account for one more row of `bytes` bytes and return the new totals.
    pub(crate) fn record(&mut self, bytes: usize) -> Self {
        self.count += 1;
        self.amount += bytes as u64;
        *self
    }
}
