//! Background logging example
//!
//! Demonstrates moving slow writes off the calling thread with a bounded
//! queue and an overflow policy.
//!
//! Run with: cargo run --example background_logging

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tagged_logger::appenders::{BackgroundAppender, WriterAppender};
use tagged_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Tagged Logger - Background Logging Example ===\n");

    let background = BackgroundAppender::builder(WriterAppender::new(std::io::stdout()).with_name("stdout"))
        .capacity(256)
        .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
        .on_overflow(Arc::new(|dropped| {
            eprintln!("queue full, {} records dropped so far", dropped);
        }))
        .shutdown_timeout(Duration::from_secs(2))
        .build();
    let sink = Sink::new(background).json(true).shared();

    println!("1. Logging from several threads:");
    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                let logger = Logger::builder(format!("worker-{}", worker))
                    .sink(sink)
                    .extra_field("worker", worker)
                    .build();
                for i in 0..25 {
                    logger.info_with("tick", [LogArg::from(i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker thread panicked");
        }
    }
    let elapsed = start.elapsed();

    sink.flush()?;
    println!("\n2. Enqueued 100 records in {:?}", elapsed);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
