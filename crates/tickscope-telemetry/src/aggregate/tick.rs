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

//! Tick-rate derivation from the tick category's timing statistics.

use tickscope_core::telemetry::report::{TickHealth, TickReport};
use tickscope_core::telemetry::stat::StatSnapshot;

/// The tick rate a healthy simulation server aims for.
pub const DEFAULT_TARGET_TPS: f64 = 20.0;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Derives a [`TickReport`] from the tick category's snapshot.
///
/// The observed rate is `1s / avg_tick`, capped at `target_tps` — a server
/// that ticks faster than its scheduler allows is still reported at target.
/// With no samples yet, the report assumes a nominal on-target tick
/// (`1000 / target_tps` milliseconds) rather than zeros, so early queries
/// render sensibly.
pub fn tick_report(snapshot: &StatSnapshot, target_tps: f64) -> TickReport {
    if snapshot.is_empty() {
        let nominal_ms = if target_tps > 0.0 {
            1_000.0 / target_tps
        } else {
            0.0
        };
        return TickReport {
            tps: target_tps,
            target_tps,
            avg_tick_ms: nominal_ms,
            min_tick_ms: nominal_ms,
            max_tick_ms: nominal_ms,
            sample_count: 0,
            health: TickHealth::Healthy,
        };
    }

    let avg_ns = snapshot.average_ns();
    let tps = if avg_ns > 0.0 {
        (NANOS_PER_SECOND / avg_ns).min(target_tps)
    } else {
        target_tps
    };

    TickReport {
        tps,
        target_tps,
        avg_tick_ms: snapshot.avg_ms(),
        min_tick_ms: snapshot.min_ms(),
        max_tick_ms: snapshot.max_ms(),
        sample_count: snapshot.count,
        health: TickHealth::classify(tps, target_tps),
    }
}
