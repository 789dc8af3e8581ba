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

//! Report assembly and JSON export.
//!
//! A [`ProfileReport`] is a fully materialized export document assembled from
//! query-API snapshots. Building one reads the registries exactly once;
//! serializing and writing it afterwards touches no live state, so export I/O
//! can never stall a producer.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tickscope_core::telemetry::monitoring::RuntimeUsageReport;
use tickscope_core::telemetry::report::{CategoryStats, GaugeSnapshot, ModuleSummary, TickReport};

/// An error that can occur while exporting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing the document (or creating its directory) failed.
    #[error("failed to write report to {path}: {source}")]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Serializing the document failed.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A complete profiling export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Tick-loop timing and health.
    pub tick: TickReport,
    /// Per-module timing summaries, slowest module first.
    pub modules: Vec<ModuleSummary>,
    /// Per-category timing rows, slowest category first.
    pub categories: Vec<CategoryStats>,
    /// Gauge values at assembly time.
    pub gauges: GaugeSnapshot,
    /// Runtime usage per registered monitor.
    pub runtime: BTreeMap<String, RuntimeUsageReport>,
}

impl ProfileReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report into `dir` as `profile-<timestamp>.json`, creating
    /// the directory if needed, and returns the written path.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        let json = self.to_json()?;

        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let filename = format!(
            "profile-{}.json",
            Local::now().format("%Y-%m-%d-%H-%M-%S")
        );
        let path = dir.join(filename);
        fs::write(&path, json).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        log::info!("Exported profile report to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickscope_core::telemetry::report::{TickHealth, TickReport};

    fn sample_report() -> ProfileReport {
        let tick = TickReport {
            tps: 20.0,
            target_tps: 20.0,
            avg_tick_ms: 50.0,
            min_tick_ms: 45.0,
            max_tick_ms: 62.0,
            sample_count: 1200,
            health: TickHealth::Healthy,
        };
        let categories = vec![CategoryStats {
            category: "core.entity.movement".to_string(),
            module: "Core".to_string(),
            count: 1200,
            total_ms: 480.0,
            avg_ms: 0.4,
            min_ms: 0.1,
            max_ms: 3.2,
        }];
        let modules = vec![ModuleSummary {
            module: "Core".to_string(),
            total_ms: 480.0,
            category_count: 1,
        }];
        let mut gauges = GaugeSnapshot::default();
        gauges.counts.insert("entities.total".to_string(), 312);
        let mut runtime = BTreeMap::new();
        runtime.insert(
            "process".to_string(),
            RuntimeUsageReport {
                resident_bytes: 64 * 1024 * 1024,
                virtual_bytes: 512 * 1024 * 1024,
                system_memory_bytes: 8 * 1024 * 1024 * 1024,
                thread_count: Some(9),
            },
        );
        ProfileReport {
            generated_at: Utc::now(),
            tick,
            modules,
            categories,
            gauges,
            runtime,
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        let back: ProfileReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn json_contains_all_sections() {
        let json = sample_report().to_json().unwrap();
        for section in ["generated_at", "tick", "modules", "categories", "gauges", "runtime"] {
            assert!(json.contains(section), "missing section: {section}");
        }
    }

    #[test]
    fn write_json_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let path = sample_report().write_json(&target).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("profile-"));
        assert!(name.ends_with(".json"));

        let written = fs::read_to_string(&path).unwrap();
        let back: ProfileReport = serde_json::from_str(&written).unwrap();
        assert_eq!(back.categories.len(), 1);
    }

    #[test]
    fn write_into_unwritable_path_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"occupied").unwrap();

        // The target "directory" is an existing file, so creation must fail.
        let err = sample_report().write_json(&file).unwrap_err();
        match err {
            ReportError::Io { path, .. } => assert_eq!(path, file),
            other => panic!("unexpected error: {other}"),
        }
    }
}
