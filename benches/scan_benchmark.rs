//! Performance benchmarks for pollwatch
//!
//! Measures the per-tick cost of the polling engine against an in-memory
//! tree, so the numbers reflect scheduling and bookkeeping rather than disk
//! latency.
//!
//! **Benchmarks Included:**
//! - `enumerate`: full directory walk at 1000 and 10000 files
//! - `scan_cycles`: one full round-robin pass at several chunk sizes
//!
//! **Run benchmarks:**
//! ```bash
//! cargo bench                      # Run all benchmarks
//! cargo bench -- scan_cycles       # Scan cycles only
//! ```

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pollwatch::watcher::enumerate;
use pollwatch::{MemFs, Watcher, WatcherConfig};

/// Build a tree of `count` files spread over 100 directories.
fn build_tree(count: usize) -> MemFs {
    let fsys = MemFs::new();
    for i in 0..count {
        fsys.insert(format!("dir{:03}/file{i}.rs", i % 100), 1);
    }
    fsys.insert(".git/objects/pack", 1);
    fsys
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    for count in &[1_000, 10_000] {
        let fsys = build_tree(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| black_box(enumerate(&fsys, ".")));
        });
    }

    group.finish();
}

fn bench_scan_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_cycles");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    let fsys = build_tree(5_000);
    for chunk_size in &[1, 6, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            chunk_size,
            |b, &chunk_size| {
                let cycles = 5_000usize.div_ceil(chunk_size);
                b.iter(|| {
                    let mut watcher = Watcher::new(WatcherConfig {
                        chunk_size,
                        poll_interval: Duration::ZERO,
                        initial_watermark: 0,
                    });
                    let changes = watcher.scan_cycles(&fsys, ".", cycles).flatten().count();
                    black_box(changes)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_enumerate, bench_scan_cycles);
criterion_main!(benches);
