//! Producer/consumer example
//!
//! Three producers feed a pool of five workers through a job queue of
//! capacity 20. Processing takes a random amount of time and roughly one
//! job in ten fails.
//!
//! Run with: cargo run --example producer_consumer

use rand::Rng;
use rust_worker_pool::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn simulate(job: &Job<String>) -> Outcome {
    let mut rng = rand::thread_rng();
    thread::sleep(Duration::from_millis(rng.gen_range(0..100)));
    Outcome::from_bool(
        rng.gen::<f32>() > 0.1,
        format!("Processing: {}", job.payload()),
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Rust Worker Pool - Producer/Consumer Example ===\n");

    let config = PoolConfig::new(5, 20).with_thread_name_prefix("demo-worker");
    let pool = Arc::new(WorkerPool::new(config, simulate)?);
    pool.start()?;

    // Results are drained while producers are still submitting
    let collector = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || pool.collect())
    };

    let producers: Vec<_> = (1..=3u64)
        .map(|producer_id| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || -> Result<()> {
                let mut rng = rand::thread_rng();
                for i in 1..=10 {
                    let job = Job::new(
                        producer_id * 1000 + i,
                        format!("task {} from producer {}", i, producer_id),
                    );
                    let job_id = job.id();
                    pool.submit(job)?;
                    println!("Producer {}: queued job {}", producer_id, job_id);
                    thread::sleep(Duration::from_millis(rng.gen_range(0..20)));
                }
                Ok(())
            })
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer thread panicked")?;
    }

    pool.stop()?;
    let (results, stats) = collector.join().expect("collector thread panicked")?;

    println!("\n=== Results ({}) ===", results.len());
    for result in results.iter().take(10) {
        let mark = if result.is_success() { "✓" } else { "✗" };
        println!(
            "{} Job {} (worker {}): {}",
            mark, result.job_id, result.worker_id, result.message
        );
    }

    println!("\n=== Statistics ===");
    println!("Processed: {}", stats.processed);
    println!("Failed: {}", stats.failed);
    println!("Succeeded: {}", stats.succeeded);
    println!("Success rate: {:.1}%", stats.success_rate());
    println!(
        "Average processing time: {:?}",
        stats.average_processing_time()
    );

    println!("\nWorker load:");
    for (worker_id, count) in &stats.by_worker {
        println!("  Worker {}: {} jobs", worker_id, count);
    }

    Ok(())
}
