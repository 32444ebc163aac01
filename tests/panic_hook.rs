//! Emergency flush when a panic ends the process
//!
//! Kept in its own test binary because the panic hook is process wide.

use callsite_logger::appenders::read_lines;
use callsite_logger::core::config::LoggerConfig;
use callsite_logger::core::logger::Logger;
use callsite_logger::info;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_config_installs_hook_that_flushes_on_main_thread_panic() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fault.log");
    let config = LoggerConfig {
        log_file: log_file.clone(),
        debug_only: false,
        delete_logs: false,
        flush_interval_ms: 60_000,
        panic_hook: true,
        ..LoggerConfig::default()
    };

    let logger = Logger::from_config(&config).expect("Failed to build logger");
    info!(logger, "before the fault");
    assert_eq!(logger.pending(), 1);

    // The hook identifies the thread running `main` by its name
    let outcome = thread::Builder::new()
        .name("main".to_string())
        .spawn(|| panic!("main fault"))
        .expect("Failed to spawn thread")
        .join();
    assert!(outcome.is_err());

    let lines = read_lines(&log_file).expect("Failed to read log file");
    assert_eq!(lines.len(), 2, "lines: {:?}", lines);
    assert!(lines[0].ends_with("((before the fault))"));
    assert!(lines[1].contains("|ERROR||((Runtime terminating: main fault at "));
    assert_eq!(logger.pending(), 0);
}
