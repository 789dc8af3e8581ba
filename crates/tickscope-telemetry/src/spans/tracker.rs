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

//! Span tracking for one caller context.

use crate::metrics::registry::TimingRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tickscope_core::telemetry::stat::TimingStat;

/// Open-span bookkeeping for one logical caller context (a worker thread, a
/// fiber, the tick loop).
///
/// Each context owns its tracker outright; the private start-time map is
/// shared with nobody, so `enter` and `exit` need no synchronization at all.
/// Only the final record on a matched exit touches shared state, through the
/// accumulator's atomic fields.
///
/// Misuse is absorbed, never surfaced: a second `enter` for a category with
/// an unfinished span silently discards the earlier one (last-enter-wins),
/// and an `exit` with no matching `enter` records nothing and returns `None`.
#[derive(Debug)]
pub struct SpanTracker {
    registry: Arc<TimingRegistry>,
    open: HashMap<String, Instant>,
    // Resolved stat handles, so steady-state exits skip the registry lock.
    handles: HashMap<String, Arc<TimingStat>>,
}

impl SpanTracker {
    /// Creates a tracker recording into `registry`.
    pub fn new(registry: Arc<TimingRegistry>) -> Self {
        Self {
            registry,
            open: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    /// Opens a span for `category` at the current instant.
    ///
    /// Any unfinished span for the same category is overwritten and will
    /// never be reported.
    pub fn enter(&mut self, category: &str) {
        self.open.insert(category.to_string(), Instant::now());
    }

    /// Closes the span for `category`, records its elapsed duration, and
    /// returns it.
    ///
    /// Returns `None` without side effects if no span is open for `category`.
    pub fn exit(&mut self, category: &str) -> Option<Duration> {
        let start = self.open.remove(category)?;
        let elapsed = start.elapsed();
        self.stat(category).record_duration(elapsed);
        Some(elapsed)
    }

    /// Number of spans currently open in this context.
    pub fn open_spans(&self) -> usize {
        self.open.len()
    }

    /// Returns true if a span is open for `category`.
    pub fn is_open(&self, category: &str) -> bool {
        self.open.contains_key(category)
    }

    fn stat(&mut self, category: &str) -> &TimingStat {
        if !self.handles.contains_key(category) {
            self.handles
                .insert(category.to_string(), self.registry.get_or_create(category));
        }
        &self.handles[category]
    }
}
