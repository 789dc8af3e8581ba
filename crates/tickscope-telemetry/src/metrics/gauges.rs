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

//! Registry for gauge metrics: current-value counts with no timing semantics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tickscope_core::telemetry::report::GaugeSnapshot;

/// Central registry for gauges (e.g. entity totals, loaded chunk counts).
///
/// Gauges bypass span timing entirely: a producer stores the current value and
/// the reporting layer reads it back. Registration follows the same
/// insert-if-absent discipline as the timing registry, and updates are plain
/// atomic stores.
#[derive(Debug, Default)]
pub struct GaugeRegistry {
    gauges: RwLock<HashMap<String, Arc<AtomicU64>>>,
}

impl GaugeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            gauges: RwLock::new(HashMap::new()),
        }
    }

    /// Sets `gauge` to `value`, registering it on first use.
    pub fn set(&self, gauge: &str, value: u64) {
        self.cell(gauge).store(value, Ordering::Relaxed);
    }

    /// Adds `delta` to `gauge`, registering it on first use, and returns the
    /// new value.
    pub fn add(&self, gauge: &str, delta: u64) -> u64 {
        self.cell(gauge).fetch_add(delta, Ordering::Relaxed) + delta
    }

    /// Reads the current value of `gauge`, or `None` if it was never set.
    pub fn get(&self, gauge: &str) -> Option<u64> {
        read(&self.gauges)
            .get(gauge)
            .map(|cell| cell.load(Ordering::Relaxed))
    }

    /// Takes a point-in-time copy of all gauges, sorted by name.
    pub fn snapshot(&self) -> GaugeSnapshot {
        let counts = read(&self.gauges)
            .iter()
            .map(|(name, cell)| (name.clone(), cell.load(Ordering::Relaxed)))
            .collect();
        GaugeSnapshot { counts }
    }

    /// Zeroes every gauge. Names survive; values do not.
    pub fn reset_all(&self) {
        for cell in read(&self.gauges).values() {
            cell.store(0, Ordering::Relaxed);
        }
    }

    /// Number of registered gauges.
    pub fn len(&self) -> usize {
        read(&self.gauges).len()
    }

    /// Returns true if no gauge has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, gauge: &str) -> Arc<AtomicU64> {
        if let Ok(gauges) = self.gauges.read() {
            if let Some(cell) = gauges.get(gauge) {
                return Arc::clone(cell);
            }
        }
        let mut gauges = self
            .gauges
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(gauges.entry(gauge.to_string()).or_insert_with(|| {
            log::debug!("registered gauge: {gauge}");
            Arc::new(AtomicU64::new(0))
        }))
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}
