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

//! Provides the foundational types and data structures for runtime profiling.
//!
//! This module defines the "common language" for all timing and gauge data
//! within tickscope. It contains the core contracts and value types that allow
//! different parts of a host server to report performance data in a
//! standardized way, while `tickscope-telemetry` provides the central service
//! for aggregating it.

pub mod category;
pub mod monitoring;
pub mod report;
pub mod stat;

pub use self::category::CategoryId;
pub use self::monitoring::{ResourceMonitor, RuntimeUsageReport};
pub use self::report::{CategoryStats, GaugeSnapshot, ModuleSummary, TickHealth, TickReport};
pub use self::stat::{StatSnapshot, TimingStat};
