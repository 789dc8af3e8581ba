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

//! A simple monotonic stopwatch.

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time from a monotonic start point.
///
/// A stopwatch starts running on creation and can be stopped and restarted.
/// While stopped, elapsed queries return `None`.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Option<Instant>,
}

impl Stopwatch {
    /// Creates a stopwatch that is already running.
    pub fn new() -> Self {
        Self {
            start: Some(Instant::now()),
        }
    }

    /// Creates a stopwatch that is not running.
    pub fn stopped() -> Self {
        Self { start: None }
    }

    /// Starts (or restarts) the stopwatch from now.
    pub fn restart(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Stops the stopwatch and returns the elapsed time, if it was running.
    pub fn stop(&mut self) -> Option<Duration> {
        self.start.take().map(|start| start.elapsed())
    }

    /// Returns true if the stopwatch is running.
    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    /// Elapsed time since the last start, or `None` if not running.
    pub fn elapsed(&self) -> Option<Duration> {
        self.start.map(|start| start.elapsed())
    }

    /// Elapsed time in fractional seconds, or `None` if not running.
    pub fn elapsed_secs_f64(&self) -> Option<f64> {
        self.elapsed().map(|d| d.as_secs_f64())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn running_stopwatch_reports_elapsed() {
        let stopwatch = Stopwatch::new();
        thread::sleep(Duration::from_millis(5));
        let elapsed = stopwatch.elapsed().unwrap();
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn stopped_stopwatch_reports_nothing() {
        let stopwatch = Stopwatch::stopped();
        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed(), None);
        assert_eq!(stopwatch.elapsed_secs_f64(), None);
    }

    #[test]
    fn stop_consumes_the_start_point() {
        let mut stopwatch = Stopwatch::new();
        assert!(stopwatch.stop().is_some());
        assert!(stopwatch.stop().is_none());
        assert_eq!(stopwatch.elapsed(), None);

        stopwatch.restart();
        assert!(stopwatch.is_running());
    }
}
