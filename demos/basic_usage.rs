//! Basic logger usage example
//!
//! Demonstrates console output, level filtering and multi-part messages.
//!
//! Run with: cargo run --example basic_usage

use fanout_logger::prelude::*;
use fanout_logger::{info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Fanout Logger - Basic Usage Example ===\n");

    let cancel = CancellationToken::new();
    let logger = Logger::new(&cancel)?;
    logger.add_handler(Arc::new(ConsoleHandler::new()));

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message (stderr)");
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    println!("\n2. Minimum level set to WARN - debug and info won't show:");
    logger.set_level(LogLevel::Warn);
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    logger.warn("Warning message (visible)");
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    println!("\n3. Multi-part and formatted messages:");
    logger.set_level(LogLevel::Debug);
    logger.info(["user", "42", "signed", "in"]);
    info!(logger, "Listening on port {}", 8080);
    warn!(logger, "Retry {} of {}", 2, 5);
    logger.info("Embedded\nnewlines are escaped");

    logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
