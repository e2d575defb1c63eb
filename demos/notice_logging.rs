//! Notice path example
//!
//! Regular entries go to the console; notices are also handed to an alerting
//! callback.
//!
//! Run with: cargo run --example notice_logging

use fanout_logger::prelude::*;
use fanout_logger::notice;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Fanout Logger - Notice Example ===\n");

    let pager = CallbackHandler::new("pager", |entry: &LogEntry| {
        println!(">>> PAGE: [{}] {}", entry.level, entry.message);
        Ok(())
    });

    let logger = Logger::builder()
        .handler(Arc::new(ConsoleHandler::new()))
        .notice_handler(Arc::new(pager))
        .build(&CancellationToken::new())?;

    logger.info("routine message, console only");
    logger.error_notice("payment provider unreachable");
    logger.warn_json_notice(&LogFields::new().with("queue", "orders").with("depth", 10_000));
    notice!(logger, LogLevel::Info, "deploy {} finished", "v2.3.1");

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await;

    println!("\nDelivered: {}", logger.metrics().delivered_count());
    Ok(())
}
