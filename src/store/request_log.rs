//! Request duration samples.

use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

/// Aggregate view of the recorded samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of samples.
    pub total: u64,
    /// Mean duration in milliseconds, `0` when there are no samples.
    pub average: f64,
}

#[derive(Default)]
struct Totals {
    count: u64,
    elapsed: Duration,
}

/// Running count and sum of request durations.
///
/// Only the aggregate is kept, which is all the summary needs.
#[derive(Default)]
pub struct RequestLog {
    totals: Mutex<Totals>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample.
    pub fn record(&self, elapsed: Duration) {
        let mut totals = self.totals.lock();
        totals.count += 1;
        totals.elapsed += elapsed;
    }

    pub fn summary(&self) -> Summary {
        let totals = self.totals.lock();
        let average = if totals.count == 0 {
            0.0
        } else {
            totals.elapsed.as_secs_f64() * 1000.0 / totals.count as f64
        };
        Summary {
            total: totals.count,
            average,
        }
    }
}
