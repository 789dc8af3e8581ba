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

//! Registry mapping category names to shared timing accumulators.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tickscope_core::telemetry::category::CategoryId;
use tickscope_core::telemetry::stat::{StatSnapshot, TimingStat};

/// Central registry for timing statistics.
///
/// Maps category names to shared [`TimingStat`] accumulators. Lookup takes a
/// shared read lock; the write lock is taken only when a category is seen for
/// the first time, and no lock is ever held across a `record` call — once a
/// producer holds its `Arc` handle, recording touches nothing but the stat's
/// own atomic fields.
///
/// Concurrent first registration of the same category converges on a single
/// accumulator: the losing candidate is discarded inside the write-locked
/// insert and its caller receives the winner's handle.
#[derive(Debug, Default)]
pub struct TimingRegistry {
    stats: RwLock<HashMap<String, Arc<TimingStat>>>,
}

impl TimingRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            stats: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the shared accumulator for `category`, registering it on first
    /// use.
    pub fn get_or_create(&self, category: &str) -> Arc<TimingStat> {
        // Fast path: the category almost always exists already.
        if let Ok(stats) = self.stats.read() {
            if let Some(stat) = stats.get(category) {
                return Arc::clone(stat);
            }
        }

        let mut stats = lock_write(&self.stats);
        let stat = stats.entry(category.to_string()).or_insert_with(|| {
            log::debug!("registered timing category: {category}");
            Arc::new(TimingStat::new())
        });
        Arc::clone(stat)
    }

    /// Returns the accumulator for `category` if it has been registered.
    pub fn get(&self, category: &str) -> Option<Arc<TimingStat>> {
        lock_read(&self.stats).get(category).map(Arc::clone)
    }

    /// Records one duration sample for `category`, registering it on first
    /// use.
    pub fn record(&self, category: &str, duration_ns: u64) {
        self.get_or_create(category).record(duration_ns);
    }

    /// Takes a point-in-time walk of the current category set, sorted by
    /// category name.
    ///
    /// Categories registered while the walk is in progress may or may not
    /// appear; producers are never paused for a read.
    pub fn all(&self) -> Vec<(CategoryId, StatSnapshot)> {
        let mut rows: Vec<(CategoryId, StatSnapshot)> = lock_read(&self.stats)
            .iter()
            .map(|(name, stat)| (CategoryId::new(name.as_str()), stat.snapshot()))
            .collect();
        rows.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        rows
    }

    /// Resets every registered accumulator. Category identities survive; only
    /// their statistics are cleared.
    pub fn reset_all(&self) {
        for stat in lock_read(&self.stats).values() {
            stat.reset();
        }
    }

    /// Number of registered categories.
    pub fn len(&self) -> usize {
        lock_read(&self.stats).len()
    }

    /// Returns true if no category has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `category` has been registered.
    pub fn contains(&self, category: &str) -> bool {
        lock_read(&self.stats).contains_key(category)
    }
}

// A poisoned lock only means some thread panicked while holding it; the map
// itself is still sound, and a metrics registry must outlive such a panic
// rather than propagate it into every producer.
fn lock_read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock_write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
