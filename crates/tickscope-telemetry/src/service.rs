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

//! The profiler service: the single aggregation object a host constructs at
//! startup and hands to its producers and reporting layer.

use crate::aggregate::{self, tick::DEFAULT_TARGET_TPS, AggregateConfig};
use crate::metrics::gauges::GaugeRegistry;
use crate::metrics::registry::TimingRegistry;
use crate::monitoring::registry::MonitorRegistry;
use crate::report::ProfileReport;
use crate::spans::tracker::SpanTracker;
use crate::utils::timer::ScopedTimer;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tickscope_core::telemetry::report::{CategoryStats, ModuleSummary, TickReport};
use tickscope_core::telemetry::monitoring::ResourceMonitor;
use tickscope_core::telemetry::stat::TimingStat;

/// The category under which the host records whole-tick durations.
pub const TICK_CATEGORY: &str = "tick";

/// Service aggregating timing samples, gauges, and runtime monitoring for a
/// tick-based host.
///
/// One instance is constructed at process start and shared (by reference or
/// `Arc`) with every producer and with the reporting layer; there is no
/// global instance. Producers record through [`span_tracker`](Self::span_tracker),
/// [`record`](Self::record), or [`set_gauge`](Self::set_gauge) without ever
/// blocking; readers pull snapshots whenever they like.
#[derive(Debug)]
pub struct ProfilerService {
    timings: Arc<TimingRegistry>,
    gauges: GaugeRegistry,
    monitors: MonitorRegistry,
    aggregate: AggregateConfig,
    target_tps: f64,
    last_update: Mutex<Instant>,
    update_interval: Duration,
}

impl ProfilerService {
    /// Creates a service whose monitors refresh at the given interval.
    pub fn new(update_interval: Duration) -> Self {
        Self {
            timings: Arc::new(TimingRegistry::new()),
            gauges: GaugeRegistry::new(),
            monitors: MonitorRegistry::new(),
            aggregate: AggregateConfig::default(),
            target_tps: DEFAULT_TARGET_TPS,
            last_update: Mutex::new(Instant::now()),
            update_interval,
        }
    }

    /// Overrides the target tick rate used for tick reports.
    pub fn with_target_tps(mut self, target_tps: f64) -> Self {
        self.target_tps = target_tps;
        self
    }

    /// Overrides the aggregation thresholds.
    pub fn with_aggregate_config(mut self, config: AggregateConfig) -> Self {
        self.aggregate = config;
        self
    }

    // --- ingest -----------------------------------------------------------

    /// Creates a span tracker for one caller context (one per worker thread
    /// or task; trackers are never shared between contexts).
    pub fn span_tracker(&self) -> SpanTracker {
        SpanTracker::new(Arc::clone(&self.timings))
    }

    /// Returns the shared accumulator for `category`, registering it on
    /// first use. Producers on a hot path should hold onto the handle.
    pub fn timing(&self, category: &str) -> Arc<TimingStat> {
        self.timings.get_or_create(category)
    }

    /// Starts an RAII timer that records into `category` when dropped.
    pub fn scoped_timer(&self, category: &str) -> ScopedTimer {
        ScopedTimer::new(self.timing(category))
    }

    /// Records one duration sample for `category`.
    pub fn record(&self, category: &str, duration: Duration) {
        self.timing(category).record_duration(duration);
    }

    /// Sets the gauge `gauge` to `value`.
    pub fn set_gauge(&self, gauge: &str, value: u64) {
        self.gauges.set(gauge, value);
    }

    /// Adds `delta` to the gauge `gauge` and returns the new value.
    pub fn add_gauge(&self, gauge: &str, delta: u64) -> u64 {
        self.gauges.add(gauge, delta)
    }

    /// Reads the current value of `gauge`, if it was ever set.
    pub fn gauge(&self, gauge: &str) -> Option<u64> {
        self.gauges.get(gauge)
    }

    // --- monitoring -------------------------------------------------------

    /// Registers a runtime-resource monitor.
    pub fn register_monitor(&self, monitor: Arc<dyn ResourceMonitor>) {
        self.monitors.register(monitor);
    }

    /// Should be called periodically (e.g. once per tick). Updates all
    /// registered resource monitors if the update interval has passed;
    /// returns whether an update ran.
    pub fn tick(&self) -> bool {
        let mut last_update = self
            .last_update
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last_update.elapsed() < self.update_interval {
            return false;
        }
        *last_update = Instant::now();
        drop(last_update);

        log::trace!("Updating all resource monitors...");
        self.monitors.update_all();
        true
    }

    // --- query ------------------------------------------------------------

    /// Takes one read pass over the timing registry and returns a row per
    /// category, sorted by name. Producers are not paused; see
    /// [`TimingRegistry::all`] for the consistency contract.
    pub fn snapshot_all(&self) -> Vec<CategoryStats> {
        self.timings
            .all()
            .iter()
            .map(|(id, snapshot)| CategoryStats::from_snapshot(id, snapshot))
            .collect()
    }

    /// Per-module summaries over the current snapshot, slowest module first.
    pub fn module_summaries(&self) -> Vec<ModuleSummary> {
        aggregate::group_by_module(&self.snapshot_all())
    }

    /// Derives the tick-rate report from the [`TICK_CATEGORY`] statistics.
    pub fn tick_report(&self) -> TickReport {
        let snapshot = self
            .timings
            .get(TICK_CATEGORY)
            .map(|stat| stat.snapshot())
            .unwrap_or_default();
        aggregate::tick::tick_report(&snapshot, self.target_tps)
    }

    /// Assembles a complete export document from the current state.
    pub fn report(&self) -> ProfileReport {
        let categories = aggregate::rank_by_total(&self.aggregate.active(&self.snapshot_all()));
        let modules = aggregate::group_by_module(&categories);
        ProfileReport {
            generated_at: Utc::now(),
            tick: self.tick_report(),
            modules,
            categories,
            gauges: self.gauges.snapshot(),
            runtime: self.monitors.usage_reports(),
        }
    }

    /// Resets all timing statistics and gauges. Category and gauge
    /// identities survive; values do not. Not synchronized with concurrent
    /// producers: samples racing the reset may land in either epoch.
    pub fn reset_all(&self) {
        self.timings.reset_all();
        self.gauges.reset_all();
        log::debug!("Profiler statistics reset");
    }

    /// The aggregation thresholds in effect.
    pub fn aggregate_config(&self) -> AggregateConfig {
        self.aggregate
    }

    /// The configured target tick rate.
    pub fn target_tps(&self) -> f64 {
        self.target_tps
    }
}

impl Default for ProfilerService {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
