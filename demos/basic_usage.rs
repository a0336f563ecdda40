//! Basic logger usage example
//!
//! Demonstrates tagged loggers writing to a console sink, argument kinds
//! and level thresholds.
//!
//! Run with: cargo run --example basic_usage

use serde_json::json;
use tagged_logger::prelude::*;
use tagged_logger::{error, info};

fn main() -> Result<()> {
    println!("=== Tagged Logger - Basic Usage Example ===\n");

    // Register a colored console sink that shows everything
    let console = create_sink(
        SinkConfig::new().with_level(LogLevel::Silly).with_colorize(true),
        SinkKind::Console,
        FormatOptions::default(),
    )?;
    SinkRegistry::global().register(console);

    // Loggers pick up the sinks registered before they are built
    let logger = Logger::builder("basic-usage")
        .extra_field("pid", std::process::id())
        .build();

    println!("1. Logging at different levels:");
    logger.silly("This is a silly message");
    logger.debug("This is a debug message");
    logger.verbose("This is a verbose message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Logging with arguments:");
    logger.info_with(
        "Request served",
        [LogArg::from("GET /orders"), LogArg::from(json!({"status": 200, "ms": 12}))],
    );
    info!(logger, "Cache warmed", json!({"entries": 1024}));

    let failure = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "database unreachable");
    error!(logger, "Startup check failed:", LogArg::error(&failure));

    println!("\n3. Per-sink thresholds:");
    let quiet = create_sink(
        SinkConfig::new().with_level(LogLevel::Warn),
        SinkKind::Console,
        FormatOptions::default(),
    )?;
    let quiet_logger = Logger::builder("quiet").sink(quiet).build();
    println!("   Threshold set to WARN - debug and info won't show:");
    quiet_logger.debug("Debug message (hidden)");
    quiet_logger.info("Info message (hidden)");
    quiet_logger.warn("Warning message (visible)");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
