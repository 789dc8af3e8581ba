// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The concurrent running-statistics accumulator.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Nanoseconds per millisecond, for boundary conversions.
pub const NANOS_PER_MS: f64 = 1_000_000.0;

/// Sentinel stored in the min field until the first sample arrives.
const MIN_UNSET: u64 = u64::MAX;

/// A concurrency-safe accumulator of duration samples for one category.
///
/// Holds four independently atomic fields: sample count, total nanoseconds,
/// minimum and maximum nanoseconds. Any number of producer threads may call
/// [`record`](Self::record) concurrently without coordination; min and max
/// converge through atomic compare-and-retry updates.
///
/// # Consistency
///
/// Atomicity is per field only. A reader may observe `count` incremented
/// before `total_ns` reflects the same sample, so a snapshot taken mid-burst
/// can show an average slightly inconsistent with a separately read count.
/// Statistics are exact once writers are quiescent. [`reset`](Self::reset) is
/// likewise unsynchronized with racing `record` calls: a racing sample may be
/// lost entirely or land (wholly or partially) in the post-reset epoch.
#[derive(Debug)]
pub struct TimingStat {
    count: AtomicU64,
    total_ns: AtomicU64,
    min_ns: AtomicU64,
    max_ns: AtomicU64,
}

impl Default for TimingStat {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingStat {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            total_ns: AtomicU64::new(0),
            min_ns: AtomicU64::new(MIN_UNSET),
            max_ns: AtomicU64::new(0),
        }
    }

    /// Records one duration sample, in nanoseconds.
    pub fn record(&self, duration_ns: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ns.fetch_add(duration_ns, Ordering::Relaxed);
        self.min_ns.fetch_min(duration_ns, Ordering::Relaxed);
        self.max_ns.fetch_max(duration_ns, Ordering::Relaxed);
    }

    /// Records one duration sample.
    ///
    /// Durations beyond ~584 years saturate the nanosecond field.
    pub fn record_duration(&self, duration: Duration) {
        self.record(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX));
    }

    /// Returns the number of samples recorded since creation or last reset.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Returns the mean sample duration in nanoseconds, or 0 with no samples.
    pub fn average_ns(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.total_ns.load(Ordering::Relaxed) as f64 / count as f64
    }

    /// Takes a point-in-time copy of all four fields.
    ///
    /// Each field is read once; there is no atomic multi-field read (see the
    /// type-level consistency note). The unset-min sentinel is normalized to
    /// 0 in the returned snapshot.
    pub fn snapshot(&self) -> StatSnapshot {
        let min_ns = self.min_ns.load(Ordering::Relaxed);
        StatSnapshot {
            count: self.count.load(Ordering::Relaxed),
            total_ns: self.total_ns.load(Ordering::Relaxed),
            min_ns: if min_ns == MIN_UNSET { 0 } else { min_ns },
            max_ns: self.max_ns.load(Ordering::Relaxed),
        }
    }

    /// Returns all four fields to their initial state.
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
        self.total_ns.store(0, Ordering::Relaxed);
        self.min_ns.store(MIN_UNSET, Ordering::Relaxed);
        self.max_ns.store(0, Ordering::Relaxed);
    }
}

/// An immutable point-in-time copy of one category's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatSnapshot {
    /// Number of recorded samples.
    pub count: u64,
    /// Sum of all recorded durations, in nanoseconds.
    pub total_ns: u64,
    /// Smallest recorded duration in nanoseconds; 0 with no samples.
    pub min_ns: u64,
    /// Largest recorded duration in nanoseconds; 0 with no samples.
    pub max_ns: u64,
}

impl StatSnapshot {
    /// Returns true if no samples were recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the mean sample duration in nanoseconds, or 0 with no samples.
    pub fn average_ns(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_ns as f64 / self.count as f64
    }

    /// Total duration in fractional milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.total_ns as f64 / NANOS_PER_MS
    }

    /// Mean duration in fractional milliseconds.
    pub fn avg_ms(&self) -> f64 {
        self.average_ns() / NANOS_PER_MS
    }

    /// Minimum duration in fractional milliseconds.
    pub fn min_ms(&self) -> f64 {
        self.min_ns as f64 / NANOS_PER_MS
    }

    /// Maximum duration in fractional milliseconds.
    pub fn max_ms(&self) -> f64 {
        self.max_ns as f64 / NANOS_PER_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_stat_reads_as_zero() {
        let stat = TimingStat::new();
        let snap = stat.snapshot();
        assert_eq!(snap.count, 0);
        assert_eq!(snap.total_ns, 0);
        assert_eq!(snap.min_ns, 0);
        assert_eq!(snap.max_ns, 0);
        assert_eq!(stat.average_ns(), 0.0);
        assert!(snap.is_empty());
    }

    #[test]
    fn record_updates_all_fields() {
        let stat = TimingStat::new();
        stat.record(40_000_000);
        stat.record(50_000_000);
        stat.record(60_000_000);

        let snap = stat.snapshot();
        assert_eq!(snap.count, 3);
        assert_eq!(snap.total_ns, 150_000_000);
        assert_eq!(snap.min_ns, 40_000_000);
        assert_eq!(snap.max_ns, 60_000_000);
        assert_eq!(snap.avg_ms(), 50.0);
        assert_eq!(snap.total_ms(), 150.0);
        assert_eq!(snap.min_ms(), 40.0);
        assert_eq!(snap.max_ms(), 60.0);
    }

    #[test]
    fn min_le_average_le_max_after_records() {
        let stat = TimingStat::new();
        for d in [7, 3, 12, 9, 3, 25] {
            stat.record(d);
        }
        let snap = stat.snapshot();
        assert!(snap.min_ns as f64 <= snap.average_ns());
        assert!(snap.average_ns() <= snap.max_ns as f64);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let stat = TimingStat::new();
        stat.record(1_000);
        stat.record(2_000);
        stat.reset();

        let snap = stat.snapshot();
        assert_eq!(snap.count, 0);
        assert_eq!(snap.total_ns, 0);
        assert_eq!(snap.min_ns, 0);
        assert_eq!(snap.max_ns, 0);
        assert_eq!(stat.average_ns(), 0.0);

        // The accumulator stays usable after a reset.
        stat.record(5_000);
        let snap = stat.snapshot();
        assert_eq!(snap.count, 1);
        assert_eq!(snap.min_ns, 5_000);
        assert_eq!(snap.max_ns, 5_000);
    }

    #[test]
    fn record_duration_converts_to_nanos() {
        let stat = TimingStat::new();
        stat.record_duration(Duration::from_millis(2));
        let snap = stat.snapshot();
        assert_eq!(snap.total_ns, 2_000_000);
        assert_eq!(snap.count, 1);
    }

    #[test]
    fn concurrent_records_lose_nothing() {
        let stat = Arc::new(TimingStat::new());
        let threads = 8;
        let per_thread = 10_000u64;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let stat = Arc::clone(&stat);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        // Spread values so each thread contributes a distinct range.
                        stat.record(t * per_thread + i + 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let n = threads * per_thread;
        let snap = stat.snapshot();
        assert_eq!(snap.count, n);
        assert_eq!(snap.total_ns, n * (n + 1) / 2);
        assert_eq!(snap.min_ns, 1);
        assert_eq!(snap.max_ns, n);
    }
}
