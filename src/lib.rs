//! # Call-site Logger
//!
//! Records which method was called, with which parameters and argument
//! values, as one deterministic text line per event.
//!
//! ## Features
//!
//! - **Call-site capture**: the calling type and method are captured at
//!   compile time, closures and async bodies are unwrapped to their enclosing
//!   function
//! - **Buffered delivery**: marker calls only enqueue; a background thread
//!   drains to the sinks
//! - **Bounded retry**: failed writes are retried with backoff, then counted
//!   as dropped
//!
//! ```
//! use callsite_logger::prelude::*;
//! use callsite_logger::{called, info};
//!
//! struct Greeter {
//!     logger: Logger,
//! }
//!
//! impl Greeter {
//!     fn greet(&self, name: &str, times: u32) {
//!         called!(self.logger, name, times);
//!         info!(self.logger, "greeting {}", name);
//!     }
//! }
//!
//! let memory = MemorySink::new();
//! let logger = Logger::builder()
//!     .sink(memory.clone())
//!     .background_flush(false)
//!     .build()
//!     .unwrap();
//!
//! let greeter = Greeter { logger };
//! greeter.greet("Ada", 2);
//! greeter.logger.flush();
//!
//! let lines = memory.lines();
//! assert!(lines[0].ends_with("|CALLED|Greeter|greet((&str)name=Ada, (u32)times=2)"));
//! assert!(lines[1].ends_with("|INFO|Greeter|greet((greeting Ada))"));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleSink, FileSink, MemorySink};
    pub use crate::core::{
        Argument, CallKind, CallRecord, CallSite, CallerMethod, CallerResolver, Clock, FixedClock,
        LineFormatter, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Param,
        Result, RetryPolicy, Sink, SinkFilter, SystemClock, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use appenders::{ConsoleSink, FileSink, MemorySink};
pub use core::{
    Argument, CallKind, CallRecord, CallSite, CallerMethod, CallerResolver, Clock, FixedClock,
    LineFormatter, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Param, Result,
    RetryPolicy, Sink, SinkFilter, SystemClock, DEFAULT_SHUTDOWN_TIMEOUT,
};
