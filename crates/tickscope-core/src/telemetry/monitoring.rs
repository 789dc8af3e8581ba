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

//! Provides the contract for active runtime-resource monitoring.
//!
//! "Monitoring" is distinct from timing: it involves polling a process or
//! system resource (memory, threads) for a point-in-time reading, whereas
//! timing statistics are discrete, event-based measurements accumulated by
//! [`TimingStat`](crate::telemetry::stat::TimingStat). Monitors sit outside
//! the concurrent core; they are queried on the reporting path only.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;

/// The core trait for a runtime-resource monitor.
///
/// A `ResourceMonitor` is a stateful object that knows how to query one
/// resource of the host process. The telemetry service holds a collection of
/// monitors and periodically calls `update`, then reads `usage_report` when
/// assembling a profile report.
pub trait ResourceMonitor: Send + Sync + Debug + 'static {
    /// Returns a unique, human-readable identifier for this monitor instance.
    fn monitor_id(&self) -> Cow<'static, str>;

    /// Returns a snapshot of the most recently polled usage data.
    fn usage_report(&self) -> RuntimeUsageReport;

    /// Triggers the monitor to update its internal state by polling the
    /// resource. This default implementation does nothing, for monitors that
    /// update passively.
    fn update(&self) {}
}

/// A point-in-time report of process/runtime resource usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeUsageReport {
    /// Resident (physical) memory in use by the process, in bytes.
    pub resident_bytes: u64,
    /// Virtual memory mapped by the process, in bytes.
    pub virtual_bytes: u64,
    /// Total physical memory of the machine, in bytes (0 if unknown).
    pub system_memory_bytes: u64,
    /// Number of OS threads in the process, where the platform exposes it.
    pub thread_count: Option<u64>,
}

impl RuntimeUsageReport {
    /// Resident memory in megabytes.
    pub fn resident_mb(&self) -> f64 {
        self.resident_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Virtual memory in megabytes.
    pub fn virtual_mb(&self) -> f64 {
        self.virtual_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Resident memory as a percentage of system memory, 0 if unknown.
    pub fn resident_percentage(&self) -> f64 {
        if self.system_memory_bytes == 0 {
            return 0.0;
        }
        self.resident_bytes as f64 / self.system_memory_bytes as f64 * 100.0
    }
}
