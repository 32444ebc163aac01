//! Basic logger usage example
//!
//! Demonstrates the four marker macros with a console sink.
//!
//! Run with: cargo run --example basic_usage

use callsite_logger::prelude::*;
use callsite_logger::{called, error, info, prop};
use std::time::Duration;

struct Thermostat {
    logger: Logger,
    target: f32,
}

impl Thermostat {
    fn set_target(&mut self, target: f32) {
        self.target = target;
        prop!(self.logger, target);
    }

    fn adjust(&mut self, delta: f32, reason: &str) {
        called!(self.logger, delta, reason);
        let next = self.target + delta;
        if !(5.0..=30.0).contains(&next) {
            error!(self.logger, "target {:.1} out of range", next);
            return;
        }
        self.set_target(next);
        info!(self.logger, "target is now {:.1}", self.target);
    }
}

fn main() -> Result<()> {
    println!("=== Call-site Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .sink(ConsoleSink::new())
        .flush_interval(Duration::from_millis(10))
        .build()?;

    let mut thermostat = Thermostat {
        logger,
        target: 20.0,
    };

    println!("1. Marker calls from methods:");
    thermostat.adjust(1.5, "too cold");
    thermostat.adjust(20.0, "typo");

    println!("\n2. Marker calls from a closure report the enclosing method:");
    let bump = |t: &mut Thermostat| info!(t.logger, "bump requested");
    bump(&mut thermostat);

    thermostat.logger.flush();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
