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

//! # Tickscope Telemetry
//!
//! The aggregation service of the tickscope profiler: concurrent timing and
//! gauge registries, per-context span tracking, ranking/grouping aggregation,
//! runtime-resource monitoring, and report export.
//!
//! Producers (worker threads, the tick loop) record duration samples and
//! gauge values through [`ProfilerService`] without ever blocking; the
//! reporting layer pulls immutable snapshots from the same service on demand.

pub mod aggregate;
pub mod metrics;
pub mod monitoring;
pub mod report;
pub mod service;
pub mod spans;
pub mod utils;

pub use metrics::gauges::GaugeRegistry;
pub use metrics::registry::TimingRegistry;
pub use monitoring::process::ProcessMonitor;
pub use monitoring::registry::MonitorRegistry;
pub use report::{ProfileReport, ReportError};
pub use service::ProfilerService;
pub use spans::tracker::SpanTracker;
pub use utils::timer::ScopedTimer;
