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

//! Provides RAII-based timers for automatically recording statistics. (RAII = Resource Acquisition Is Initialization)

use std::sync::Arc;
use tickscope_core::telemetry::stat::TimingStat;
use tickscope_core::utils::timer::Stopwatch;

/// A utility for timing the duration of a scope and automatically recording
/// the result in a [`TimingStat`] when it is dropped.
///
/// This leverages the RAII pattern to ensure that the measurement is always
/// recorded, even in the case of early returns or panics.
pub struct ScopedTimer {
    stopwatch: Stopwatch,
    stat: Arc<TimingStat>,
}

impl ScopedTimer {
    /// Creates a new timer for the given accumulator and starts it immediately.
    pub fn new(stat: Arc<TimingStat>) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            stat,
        }
    }
}

/// When the timer goes out of scope, it records the elapsed time.
impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(elapsed) = self.stopwatch.elapsed() {
            self.stat.record_duration(elapsed);
        }
    }
}
