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

//! Derived views over timing snapshots: ranking, module grouping,
//! percentage-of-total.
//!
//! Everything here is a pure function over already-taken snapshots; nothing
//! touches the live registries or blocks a producer.

pub mod tick;

use std::collections::BTreeMap;
use tickscope_core::telemetry::report::{CategoryStats, ModuleSummary};

/// Presentation-facing aggregation thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateConfig {
    /// Categories with a mean duration below this many milliseconds are
    /// elided from presentation views. They remain in the registry and in
    /// raw snapshots.
    pub negligible_avg_ms: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            negligible_avg_ms: 0.0001,
        }
    }
}

impl AggregateConfig {
    /// Filters out categories whose mean duration is negligible.
    pub fn active(&self, rows: &[CategoryStats]) -> Vec<CategoryStats> {
        rows.iter()
            .filter(|row| row.avg_ms >= self.negligible_avg_ms)
            .cloned()
            .collect()
    }
}

/// Sorts rows by total time descending, slowest first. Ties keep their
/// original order.
pub fn rank_by_total(rows: &[CategoryStats]) -> Vec<CategoryStats> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.total_ms.total_cmp(&a.total_ms));
    ranked
}

/// Sorts rows by mean time descending, for views where per-call cost matters
/// more than aggregate load. Ties keep their original order.
pub fn rank_by_average(rows: &[CategoryStats]) -> Vec<CategoryStats> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.avg_ms.total_cmp(&a.avg_ms));
    ranked
}

/// Buckets rows by a caller-supplied module-extraction function, summing
/// totals and counting member categories per bucket, sorted by summed total
/// descending.
pub fn group_by<F>(rows: &[CategoryStats], module_of: F) -> Vec<ModuleSummary>
where
    F: Fn(&CategoryStats) -> String,
{
    let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let bucket = buckets.entry(module_of(row)).or_insert((0.0, 0));
        bucket.0 += row.total_ms;
        bucket.1 += 1;
    }

    let mut summaries: Vec<ModuleSummary> = buckets
        .into_iter()
        .map(|(module, (total_ms, category_count))| ModuleSummary {
            module,
            total_ms,
            category_count,
        })
        .collect();
    summaries.sort_by(|a, b| b.total_ms.total_cmp(&a.total_ms));
    summaries
}

/// Buckets rows by their derived owning module.
pub fn group_by_module(rows: &[CategoryStats]) -> Vec<ModuleSummary> {
    group_by(rows, |row| row.module.clone())
}

/// Returns `value` as a percentage of `total`.
///
/// A non-positive total yields 0. The result is deliberately not clamped
/// above 100: a caller comparing against a narrower denominator (one module's
/// total versus one tick) may legitimately see more than 100%.
pub fn percentage_of(value: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    value / total * 100.0
}
