//! File logging example
//!
//! Demonstrates sinks built from a TOML document: a console sink plus a
//! daily rotating JSON archive with size-based rollover.
//!
//! Run with: cargo run --example file_logging

use tagged_logger::prelude::*;

const CONFIG: &str = r#"
[[sinks]]
kind = "console"
level = "info"

[[sinks]]
kind = "file"
level = "silly"
json = true
dirname = "logs"
filename = "file-logging-%DATE%.log"
maxsize = 4096
zippedArchive = true
maxFiles = 5
"#;

fn main() -> Result<()> {
    println!("=== Tagged Logger - File Logging Example ===\n");

    let registry = SinkRegistry::new();
    let count = LoggingConfig::from_toml_str(CONFIG)?.install(&registry)?;
    println!("Installed {} sinks\n", count);

    let logger = Logger::builder("file-logging")
        .registry(&registry)
        .extra_field("service", "demo")
        .build();

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.info("Configuration loaded successfully");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Filling the archive past its size limit:");
    for i in 1..=200 {
        logger.verbose_with("Processing item", [LogArg::from(serde_json::json!({"item": i}))]);
    }
    logger.info("Processing complete");

    registry.flush_all()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check the logs/ directory for the archive and its gzipped rollovers");

    Ok(())
}
