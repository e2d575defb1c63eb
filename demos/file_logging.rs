//! File logging example
//!
//! Writes the same entries under each split policy and prints the resulting
//! files.
//!
//! Run with: cargo run --example file_logging

use fanout_logger::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

async fn write_with(directory: &Path, split: SplitPolicy) -> Result<()> {
    let logger = Logger::builder()
        .handler(Arc::new(FileHandler::new(directory, split)?))
        .build(&CancellationToken::new())?;

    logger.debug("cache warmed");
    logger.info("request served");
    logger.warn_json(&LogFields::new().with("latency_ms", 812).with("path", "/orders"));
    logger.error("upstream timeout");

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await;
    Ok(())
}

fn print_files(directory: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        println!("  {}", path.display());
        for line in std::fs::read_to_string(&path)?.lines() {
            println!("    {}", line);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Fanout Logger - File Logging Example ===\n");

    let root = std::env::temp_dir().join("fanout_logger_demo");
    for (name, split) in [
        ("default", SplitPolicy::Default),
        ("level", SplitPolicy::ByLevel),
        ("day", SplitPolicy::ByDay),
    ] {
        let directory = root.join(name);
        write_with(&directory, split).await?;

        println!("{:?} -> {}", split, directory.display());
        print_files(&directory).map_err(|e| {
            LoggerError::io_operation("reading demo output", directory.display().to_string(), e)
        })?;
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
