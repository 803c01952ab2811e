use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_worker_pool::prelude::*;
use rust_worker_pool::BoundedQueue;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn lightweight(job: &Job<u64>) -> Outcome {
    black_box(job.payload().wrapping_mul(31));
    Outcome::succeeded("ok")
}

/// Submit `count` jobs, stop, and collect on a second thread
fn run_to_completion(pool: &WorkerPool<u64>, count: u64) -> StatsSnapshot {
    thread::scope(|s| {
        let collector = s.spawn(|| pool.collect());
        for i in 0..count {
            pool.submit_payload(i).expect("Failed to submit job");
        }
        pool.stop().expect("Failed to stop pool");
        collector.join().expect("collector thread")
    })
    .expect("Failed to collect")
    .1
}

fn benchmark_pool_lifecycle(c: &mut Criterion) {
    c.bench_function("pool_start_stop_collect", |b| {
        b.iter(|| {
            let pool = WorkerPool::with_workers(4, 100, lightweight).expect("Failed to create pool");
            pool.start().expect("Failed to start pool");
            pool.stop().expect("Failed to stop pool");
            pool.collect().expect("Failed to collect");
        });
    });
}

fn benchmark_job_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("job_throughput");

    for &capacity in &[0usize, 16, 256] {
        group.bench_function(format!("lightweight_jobs_1000_capacity_{}", capacity), |b| {
            b.iter_batched(
                || {
                    let pool = WorkerPool::with_workers(4, capacity, lightweight)
                        .expect("Failed to create pool");
                    pool.start().expect("Failed to start pool");
                    pool
                },
                |pool| {
                    let stats = run_to_completion(&pool, 1000);
                    assert_eq!(stats.processed, 1000, "Not all jobs completed");
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("medium_jobs_100", |b| {
        b.iter_batched(
            || {
                let pool = WorkerPool::with_workers(4, 32, |job: &Job<u64>| {
                    let mut sum = 0u64;
                    for i in 0..1000 {
                        sum = sum.wrapping_add(i ^ job.payload());
                    }
                    black_box(sum);
                    Outcome::succeeded("ok")
                })
                .expect("Failed to create pool");
                pool.start().expect("Failed to start pool");
                pool
            },
            |pool| {
                run_to_completion(&pool, 100);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_backpressure(c: &mut Criterion) {
    let mut group = c.benchmark_group("backpressure");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("slow_workers_small_queue", |b| {
        b.iter_batched(
            || {
                let pool = WorkerPool::with_workers(4, 4, |_: &Job<u64>| {
                    thread::sleep(Duration::from_micros(100));
                    Outcome::succeeded("ok")
                })
                .expect("Failed to create pool");
                pool.start().expect("Failed to start pool");
                pool
            },
            |pool| {
                run_to_completion(&pool, 150);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_bounded_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_queue");

    group.bench_function("push_pop_single_thread", |b| {
        let queue = BoundedQueue::new(1024);
        b.iter(|| {
            for i in 0..1000u64 {
                queue.try_push(i).expect("queue has room");
            }
            while let Some(item) = queue.try_pop() {
                black_box(item);
            }
        });
    });

    group.bench_function("spsc_capacity_64", |b| {
        b.iter(|| {
            let queue = Arc::new(BoundedQueue::new(64));
            let consumer = {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut count = 0u64;
                    while queue.pop().is_some() {
                        count += 1;
                    }
                    count
                })
            };
            for i in 0..10_000u64 {
                queue.push(i).expect("queue open");
            }
            queue.close();
            assert_eq!(consumer.join().expect("consumer thread"), 10_000);
        });
    });

    group.finish();
}

fn benchmark_stats_snapshot(c: &mut Criterion) {
    let pool = WorkerPool::with_workers(8, 16, lightweight).expect("Failed to create pool");
    pool.start().expect("Failed to start pool");

    c.bench_function("stats_snapshot_8_workers", |b| {
        b.iter(|| black_box(pool.stats()));
    });

    pool.stop().expect("Failed to stop pool");
    pool.collect().expect("Failed to collect");
}

criterion_group!(
    benches,
    benchmark_pool_lifecycle,
    benchmark_job_throughput,
    benchmark_backpressure,
    benchmark_bounded_queue,
    benchmark_stats_snapshot
);
criterion_main!(benches);
