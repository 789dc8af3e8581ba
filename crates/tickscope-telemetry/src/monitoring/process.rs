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

//! Process memory/thread monitor backed by sysinfo.

use std::borrow::Cow;
use std::sync::Mutex;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tickscope_core::telemetry::monitoring::{ResourceMonitor, RuntimeUsageReport};

/// Monitors the current process: resident and virtual memory, thread count,
/// and total system memory.
///
/// Polling walks OS tables, so it happens only in [`update`](ResourceMonitor::update)
/// (driven by the service's update interval); `usage_report` returns the last
/// polled reading without touching the OS.
#[derive(Debug)]
pub struct ProcessMonitor {
    pid: Option<Pid>,
    system: Mutex<System>,
    latest: Mutex<RuntimeUsageReport>,
}

impl ProcessMonitor {
    /// Creates a monitor for the current process.
    ///
    /// If the current pid cannot be resolved on this platform, the monitor
    /// stays inert and reports zeros rather than failing construction.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(err) => {
                log::warn!("Cannot resolve current pid, process monitor disabled: {err}");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(System::new()),
            latest: Mutex::new(RuntimeUsageReport::default()),
        }
    }
}

impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceMonitor for ProcessMonitor {
    fn monitor_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("process")
    }

    fn usage_report(&self) -> RuntimeUsageReport {
        *lock(&self.latest)
    }

    fn update(&self) {
        let Some(pid) = self.pid else { return };

        let mut system = lock(&self.system);
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let report = match system.process(pid) {
            Some(process) => RuntimeUsageReport {
                resident_bytes: process.memory(),
                virtual_bytes: process.virtual_memory(),
                system_memory_bytes: system.total_memory(),
                thread_count: process.tasks().map(|tasks| tasks.len() as u64),
            },
            None => RuntimeUsageReport::default(),
        };
        *lock(&self.latest) = report;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_zero_before_the_first_update() {
        let monitor = ProcessMonitor::new();
        assert_eq!(monitor.usage_report(), RuntimeUsageReport::default());
    }

    #[test]
    fn update_polls_the_current_process() {
        let monitor = ProcessMonitor::new();
        monitor.update();

        let report = monitor.usage_report();
        assert!(report.resident_bytes > 0);
        assert!(report.system_memory_bytes > 0);
        assert!(report.resident_percentage() > 0.0);
    }
}
