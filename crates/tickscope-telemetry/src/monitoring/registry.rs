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

//! Registry for managing resource monitors.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tickscope_core::telemetry::monitoring::{ResourceMonitor, RuntimeUsageReport};

/// A thread-safe registry for resource monitors.
#[derive(Debug, Clone, Default)]
pub struct MonitorRegistry {
    monitors: Arc<Mutex<Vec<Arc<dyn ResourceMonitor>>>>,
}

impl MonitorRegistry {
    /// Creates a new, empty monitor registry.
    pub fn new() -> Self {
        Self {
            monitors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a new resource monitor.
    pub fn register(&self, monitor: Arc<dyn ResourceMonitor>) {
        let mut monitors = lock(&self.monitors);
        let monitor_id = monitor.monitor_id().to_string();
        monitors.push(monitor);
        log::info!("Registered resource monitor: {monitor_id}");
    }

    /// Calls the `update` method on all registered monitors.
    pub fn update_all(&self) {
        for monitor in lock(&self.monitors).iter() {
            monitor.update();
        }
    }

    /// Returns a clone of all registered monitors.
    pub fn all(&self) -> Vec<Arc<dyn ResourceMonitor>> {
        lock(&self.monitors).clone()
    }

    /// Collects the latest usage report from every monitor, keyed by monitor
    /// id.
    pub fn usage_reports(&self) -> BTreeMap<String, RuntimeUsageReport> {
        lock(&self.monitors)
            .iter()
            .map(|monitor| (monitor.monitor_id().to_string(), monitor.usage_report()))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, Default)]
    struct FakeMonitor {
        updates: AtomicU64,
    }

    impl ResourceMonitor for FakeMonitor {
        fn monitor_id(&self) -> Cow<'static, str> {
            Cow::Borrowed("fake")
        }

        fn usage_report(&self) -> RuntimeUsageReport {
            RuntimeUsageReport {
                resident_bytes: self.updates.load(Ordering::Relaxed),
                ..Default::default()
            }
        }

        fn update(&self) {
            self.updates.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn update_all_sweeps_every_monitor() {
        let registry = MonitorRegistry::new();
        let monitor = Arc::new(FakeMonitor::default());
        registry.register(monitor.clone());
        registry.register(Arc::new(FakeMonitor::default()));

        registry.update_all();
        registry.update_all();
        assert_eq!(monitor.updates.load(Ordering::Relaxed), 2);
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn usage_reports_are_keyed_by_monitor_id() {
        let registry = MonitorRegistry::new();
        let monitor = Arc::new(FakeMonitor::default());
        registry.register(monitor);
        registry.update_all();

        let reports = registry.usage_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports["fake"].resident_bytes, 1);
    }
}
