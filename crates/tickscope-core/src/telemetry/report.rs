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

//! Immutable value structs served to the presentation and export layers.
//!
//! All durations cross this boundary in fractional milliseconds, converted
//! exactly once from the internal nanosecond integers. Consumers never see
//! raw nanoseconds.

use crate::telemetry::category::CategoryId;
use crate::telemetry::stat::StatSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the per-category timing snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Full category name.
    pub category: String,
    /// Owning module.
    pub module: String,
    /// Number of recorded samples.
    pub count: u64,
    /// Sum of all sample durations, in milliseconds.
    pub total_ms: f64,
    /// Mean sample duration, in milliseconds.
    pub avg_ms: f64,
    /// Smallest sample duration, in milliseconds (0 with no samples).
    pub min_ms: f64,
    /// Largest sample duration, in milliseconds (0 with no samples).
    pub max_ms: f64,
}

impl CategoryStats {
    /// Builds a row from a category identity and a stat snapshot.
    pub fn from_snapshot(id: &CategoryId, snapshot: &StatSnapshot) -> Self {
        Self {
            category: id.name.clone(),
            module: id.module.clone(),
            count: snapshot.count,
            total_ms: snapshot.total_ms(),
            avg_ms: snapshot.avg_ms(),
            min_ms: snapshot.min_ms(),
            max_ms: snapshot.max_ms(),
        }
    }
}

/// Aggregated timing for one module: derived fresh on each query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    /// Module name.
    pub module: String,
    /// Sum of member-category totals, in milliseconds.
    pub total_ms: f64,
    /// Number of member categories.
    pub category_count: usize,
}

/// Health classification of the tick loop, relative to its target rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickHealth {
    /// At or near the target rate (>= 95% of target).
    Healthy,
    /// Noticeably below target (>= 75% of target).
    Warning,
    /// Severely degraded (< 75% of target).
    Critical,
}

impl TickHealth {
    /// Classifies an observed ticks-per-second value against a target rate.
    pub fn classify(tps: f64, target_tps: f64) -> Self {
        if tps >= target_tps * 0.95 {
            TickHealth::Healthy
        } else if tps >= target_tps * 0.75 {
            TickHealth::Warning
        } else {
            TickHealth::Critical
        }
    }
}

/// Derived view of tick-loop timing: rate, per-tick durations, and health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Observed ticks per second, capped at the target rate.
    pub tps: f64,
    /// The configured target rate.
    pub target_tps: f64,
    /// Mean tick duration, in milliseconds.
    pub avg_tick_ms: f64,
    /// Smallest tick duration, in milliseconds.
    pub min_tick_ms: f64,
    /// Largest tick duration, in milliseconds.
    pub max_tick_ms: f64,
    /// Number of tick samples behind this report.
    pub sample_count: u64,
    /// Health classification of `tps` against `target_tps`.
    pub health: TickHealth,
}

impl TickReport {
    /// Observed rate as a percentage of target, clamped to 100.
    pub fn tps_percentage(&self) -> f64 {
        if self.target_tps <= 0.0 {
            return 0.0;
        }
        (self.tps / self.target_tps * 100.0).min(100.0)
    }
}

/// A point-in-time copy of all gauge values, sorted by gauge name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GaugeSnapshot {
    /// Current value per gauge.
    pub counts: BTreeMap<String, u64>,
}

impl GaugeSnapshot {
    /// Sum of all gauge values.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct gauges.
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }
}
