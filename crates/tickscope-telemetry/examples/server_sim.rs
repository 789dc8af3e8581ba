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

//! Simulates a small tick-based server instrumented with tickscope and
//! prints a ranked profile, then exports it as JSON.
//!
//! Run with: `cargo run --example server_sim`

use anyhow::Result;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tickscope_core::utils::format::{format_ms, format_percent, progress_bar};
use tickscope_telemetry::{aggregate, ProcessMonitor, ProfilerService};

fn main() -> Result<()> {
    env_logger::init();

    let service = Arc::new(ProfilerService::new(Duration::from_millis(200)));
    service.register_monitor(Arc::new(ProcessMonitor::new()));

    // Worker threads timing their own named operations through private
    // span trackers.
    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let mut tracker = service.span_tracker();
                for round in 0..25 {
                    tracker.enter("worker.pathfinding");
                    thread::sleep(Duration::from_micros(200 + worker * 50));
                    tracker.exit("worker.pathfinding");

                    if round % 5 == 0 {
                        tracker.enter("worker.chunk_decode");
                        thread::sleep(Duration::from_micros(800));
                        tracker.exit("worker.chunk_decode");
                    }
                }
            })
        })
        .collect();

    // The main tick loop records whole-tick durations and gauge counts.
    for tick in 0u64..40 {
        let started = Instant::now();
        {
            let _phase = service.scoped_timer("core.entity.movement");
            thread::sleep(Duration::from_micros(600));
        }
        {
            let _phase = service.scoped_timer("core.block.updates");
            thread::sleep(Duration::from_micros(300));
        }
        service.set_gauge("entities.total", 300 + tick % 7);
        service.set_gauge("chunks.loaded", 900);
        service.record("tick", started.elapsed());
        service.tick();
    }
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    // Render a ranked view the way an operator command would.
    let tick_report = service.tick_report();
    println!(
        "TPS {:.1}/{:.0} {} ({:?})",
        tick_report.tps,
        tick_report.target_tps,
        progress_bar(tick_report.tps_percentage(), 20),
        tick_report.health,
    );

    let rows = service.snapshot_all();
    let ranked = aggregate::rank_by_total(&rows);
    let grand_total: f64 = rows.iter().map(|row| row.total_ms).sum();
    println!("\n{:<28} {:>8} {:>12} {:>12} {:>8}", "category", "calls", "total", "avg", "share");
    for row in &ranked {
        println!(
            "{:<28} {:>8} {:>12} {:>12} {:>8}",
            row.category,
            row.count,
            format_ms(row.total_ms),
            format_ms(row.avg_ms),
            format_percent(aggregate::percentage_of(row.total_ms, grand_total)),
        );
    }

    println!("\nper module:");
    for summary in service.module_summaries() {
        println!(
            "  {:<16} {:>12} ({} categories)",
            summary.module,
            format_ms(summary.total_ms),
            summary.category_count,
        );
    }

    let report = service.report();
    let path = report.write_json(&std::env::temp_dir().join("tickscope"))?;
    println!("\nreport written to {}", path.display());
    Ok(())
}
