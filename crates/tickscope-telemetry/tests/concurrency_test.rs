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

//! Multi-threaded behavior of the aggregation core: uncoordinated producers
//! against a concurrently reading consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tickscope_telemetry::ProfilerService;

#[test]
fn totals_are_exact_across_uncoordinated_producers() {
    let service = Arc::new(ProfilerService::default());
    let threads = 8u64;
    let per_thread = 5_000u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for i in 0..per_thread {
                    // Every producer hits the same three categories.
                    let d = Duration::from_nanos(t * per_thread + i + 1);
                    service.record("core.entity.movement", d);
                    service.record("physics.broadphase", Duration::from_nanos(10));
                    service.record("tick", Duration::from_nanos(25));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let rows = service.snapshot_all();
    assert_eq!(rows.len(), 3);

    let n = threads * per_thread;
    let movement = rows
        .iter()
        .find(|row| row.category == "core.entity.movement")
        .unwrap();
    assert_eq!(movement.count, n);
    // Producers recorded 1..=n nanoseconds exactly once each.
    let expected_total_ms = (n * (n + 1) / 2) as f64 / 1_000_000.0;
    assert_eq!(movement.total_ms, expected_total_ms);
    assert_eq!(movement.min_ms, 1.0 / 1_000_000.0);
    assert_eq!(movement.max_ms, n as f64 / 1_000_000.0);

    let broadphase = rows
        .iter()
        .find(|row| row.category == "physics.broadphase")
        .unwrap();
    assert_eq!(broadphase.count, n);
    assert_eq!(broadphase.min_ms, broadphase.max_ms);
}

#[test]
fn snapshots_during_a_write_burst_never_block_and_stay_monotonic() {
    let service = Arc::new(ProfilerService::default());
    let stop = Arc::new(AtomicBool::new(false));

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    service.record("hot", Duration::from_nanos(500));
                }
            })
        })
        .collect();

    // Cross-field consistency is deliberately not promised mid-burst, but
    // each field on its own must only ever grow between reads.
    let mut last_count = 0u64;
    let mut last_total = 0.0f64;
    for _ in 0..200 {
        if let Some(row) = service
            .snapshot_all()
            .into_iter()
            .find(|row| row.category == "hot")
        {
            assert!(row.count >= last_count);
            assert!(row.total_ms >= last_total);
            last_count = row.count;
            last_total = row.total_ms;
        }
    }

    stop.store(true, Ordering::Relaxed);
    for producer in producers {
        producer.join().unwrap();
    }
    // One more sample from this thread guarantees the category exists even
    // if the scheduler starved every producer.
    service.record("hot", Duration::from_nanos(500));

    // At rest the statistics are exact again.
    let rows = service.snapshot_all();
    let row = rows.iter().find(|row| row.category == "hot").unwrap();
    assert_eq!(row.min_ms, row.max_ms);
    assert!((row.avg_ms - row.min_ms).abs() < f64::EPSILON);
}

#[test]
fn span_contexts_on_separate_threads_do_not_interfere() {
    let service = Arc::new(ProfilerService::default());

    let slow = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            let mut tracker = service.span_tracker();
            tracker.enter("handler.chat");
            thread::sleep(Duration::from_millis(30));
            tracker.exit("handler.chat").unwrap()
        })
    };
    let fast = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            let mut tracker = service.span_tracker();
            tracker.enter("handler.chat");
            thread::sleep(Duration::from_millis(1));
            tracker.exit("handler.chat").unwrap()
        })
    };

    let slow_elapsed = slow.join().unwrap();
    let fast_elapsed = fast.join().unwrap();
    assert!(slow_elapsed >= Duration::from_millis(30));
    assert!(fast_elapsed < slow_elapsed);

    let rows = service.snapshot_all();
    let row = rows.iter().find(|r| r.category == "handler.chat").unwrap();
    assert_eq!(row.count, 2);
    assert!(row.max_ms >= 30.0);
    assert!(row.min_ms < row.max_ms);
}

#[test]
fn racing_registration_still_counts_every_sample() {
    let service = Arc::new(ProfilerService::default());
    let threads = 8u64;

    // All threads race the first registration of the same category.
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.record("contended", Duration::from_micros(3)))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let rows = service.snapshot_all();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, threads);
}

#[test]
fn reset_with_quiescent_producers_zeroes_every_category() {
    let service = Arc::new(ProfilerService::default());
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service.record(&format!("worker.{t}"), Duration::from_millis(t + 1));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    service.reset_all();
    let rows = service.snapshot_all();
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row.count, 0);
        assert_eq!(row.total_ms, 0.0);
        assert_eq!(row.avg_ms, 0.0);
    }
}
