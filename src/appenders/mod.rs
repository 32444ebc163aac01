//! Sink implementations

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleSink;
pub use file::{delete_log_file, read_lines, FileSink};
pub use memory::MemorySink;

pub use crate::core::Sink;
