//! File logging example
//!
//! Loads `log.config.json` from the working directory tree (or falls back to
//! defaults), writes a few records and prints the resulting file.
//!
//! Run with: cargo run --example file_logging

use callsite_logger::appenders::read_lines;
use callsite_logger::prelude::*;
use callsite_logger::{called, info};
use std::time::Duration;

struct Importer<'a> {
    logger: &'a Logger,
}

impl Importer<'_> {
    fn import(&self, batch: usize) {
        called!(self.logger, batch);
        for row in 0..batch {
            info!(self.logger, "row {} imported", row);
        }
    }
}

fn main() -> Result<()> {
    println!("=== Call-site Logger - File Logging Example ===\n");

    let mut config = LoggerConfig::discover(".");
    config.debug_only = false;
    println!("Logging to {}", config.log_file.display());

    let mut logger = Logger::from_config(&config)?;
    Importer { logger: &logger }.import(3);

    logger.shutdown(Duration::from_secs(1));

    for line in read_lines(&config.log_file)? {
        println!("  {}", line);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
