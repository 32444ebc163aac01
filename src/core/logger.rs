//! Main logger implementation
//!
//! The [`Logger`] is an explicit instance, built once at startup and passed
//! by reference to the code that logs. Marker methods never return errors
//! and never panic outward.

use super::{
    call_kind::CallKind,
    call_record::CallRecord,
    call_site::{Argument, CallSite},
    clock::{Clock, SystemClock},
    config::LoggerConfig,
    error::Result,
    metrics::LoggerMetrics,
    pipeline::{DeliveryPipeline, SinkSlot},
    resolver::{CallerMethod, CallerResolver},
    retry::RetryPolicy,
    sink::{Sink, SinkFilter},
};
use crate::appenders::{delete_log_file, ConsoleSink, FileSink};
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between background drains
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

/// How long the panic hook waits for a drain already in progress
const EMERGENCY_FLUSH_WAIT: Duration = Duration::from_millis(500);

/// Prefix of the property setter convention stripped by [`Logger::prop`]
const SETTER_PREFIX: &str = "set_";

/// Name the runtime gives the thread running `main`
const MAIN_THREAD: &str = "main";

/// Whether a panic on the named thread terminates the process
///
/// Panics on other threads can be caught or joined, so only the main thread
/// or an aborting build counts.
fn ends_process(thread_name: Option<&str>) -> bool {
    cfg!(panic = "abort") || thread_name == Some(MAIN_THREAD)
}

pub struct Logger {
    /// `None` when the logger is inactive; every marker call is then a no-op
    pipeline: Option<DeliveryPipeline>,
    clock: Arc<dyn Clock>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Build a logger from a loaded configuration
    ///
    /// See [`LoggerBuilder::from_config`] for the sink wiring. With
    /// `panicHook` set, [`install_panic_hook`](Self::install_panic_hook) is
    /// called on the active logger.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        LoggerBuilder::from_config(config)?.build()
    }

    /// A logger on which every marker call is a no-op
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pipeline: None,
            clock: Arc::new(SystemClock),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn is_active(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Record that the calling method was entered with `arguments`
    pub fn called(&self, site: CallSite, arguments: Vec<Argument>) {
        self.record(CallKind::Called, site, |_| arguments);
    }

    /// Record a property change
    ///
    /// Without an explicit `property` name the resolved method name is used,
    /// minus a leading `set_`.
    pub fn prop<T: Display + ?Sized>(&self, site: CallSite, property: Option<&str>, value: &T) {
        self.record(CallKind::Prop, site, |caller| {
            let name = match property {
                Some(name) => name.to_string(),
                None => caller
                    .map(|c| {
                        let method = c.method_name.as_str();
                        method.strip_prefix(SETTER_PREFIX).unwrap_or(method).to_string()
                    })
                    .unwrap_or_default(),
            };
            vec![Argument::raw("String", name), Argument::new(value)]
        });
    }

    pub fn info(&self, site: CallSite, text: impl Into<String>) {
        let text = text.into();
        self.record(CallKind::Info, site, |_| vec![Argument::new(&text)]);
    }

    pub fn error(&self, site: CallSite, text: impl Into<String>) {
        let text = text.into();
        self.record(CallKind::Error, site, |_| vec![Argument::new(&text)]);
    }

    fn record<F>(&self, kind: CallKind, site: CallSite, arguments: F)
    where
        F: FnOnce(Option<&CallerMethod>) -> Vec<Argument>,
    {
        let Some(pipeline) = self.pipeline.as_ref() else {
            self.metrics.record_ignored();
            return;
        };

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let timestamp = self.clock.now();
            let caller = CallerResolver::resolve(site);
            let arguments = arguments(caller.as_ref());
            pipeline.enqueue(CallRecord::new(kind, timestamp, arguments, caller));
        }));
    }

    /// Drain buffered records on the calling thread
    ///
    /// Returns the number of records taken from the buffer.
    pub fn flush(&self) -> usize {
        self.pipeline.as_ref().map_or(0, DeliveryPipeline::drain)
    }

    /// Records waiting for the next drain
    pub fn pending(&self) -> usize {
        self.pipeline.as_ref().map_or(0, DeliveryPipeline::pending)
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use callsite_logger::{info, Logger, MemorySink};
    ///
    /// let logger = Logger::builder()
    ///     .sink(MemorySink::new())
    ///     .background_flush(false)
    ///     .build()
    ///     .unwrap();
    ///
    /// info!(logger, "ready");
    /// logger.flush();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.enqueued_count(), 1);
    /// assert_eq!(metrics.written_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush buffered records when a panic ends the process
    ///
    /// A panic ends the process when it happens on the main thread or when
    /// panics abort. For those the hook enqueues an `ERROR` record describing
    /// the panic and drains synchronously; every other panic may still be
    /// caught, so it is left alone. The previously installed hook always runs
    /// afterwards. Panics raised while a drain is running on the same thread
    /// are ignored.
    pub fn install_panic_hook(&self) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };
        let handle = pipeline.handle();
        let clock = Arc::clone(&self.clock);
        let previous = std::panic::take_hook();

        std::panic::set_hook(Box::new(move |info| {
            if ends_process(std::thread::current().name()) && !super::pipeline::in_drain() {
                let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = info.payload().downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                let location = info
                    .location()
                    .map(|l| format!(" at {}:{}", l.file(), l.line()))
                    .unwrap_or_default();

                let record = CallRecord::new(
                    CallKind::Error,
                    clock.now(),
                    vec![Argument::new(&format!(
                        "Runtime terminating: {}{}",
                        message, location
                    ))],
                    None,
                );
                handle.emergency_flush(record, EMERGENCY_FLUSH_WAIT);
            }
            previous(info);
        }));
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// Pending records are drained before the flush thread exits. Returns
    /// `true` if that happened within `timeout`.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        match self.pipeline.as_mut() {
            Some(pipeline) => pipeline.shutdown(timeout),
            None => true,
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped lines (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use callsite_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .sink(ConsoleSink::new())
///     .flush_interval(Duration::from_millis(20))
///     .retry_policy(RetryPolicy::none())
///     .build()
///     .unwrap();
/// assert!(logger.is_active());
/// ```
pub struct LoggerBuilder {
    sinks: Vec<SinkSlot>,
    clock: Arc<dyn Clock>,
    flush_interval: Duration,
    retry: RetryPolicy,
    active: bool,
    background_flush: bool,
    delete_on_start: Option<PathBuf>,
    panic_hook: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            clock: Arc::new(SystemClock),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            retry: RetryPolicy::default(),
            active: true,
            background_flush: true,
            delete_on_start: None,
            panic_hook: false,
        }
    }

    /// Start from a loaded configuration
    ///
    /// Registers the file sink when `fileLog` is set and the console sink when
    /// `consoleLog` is set (restricted to `INFO` lines with `infoOnly`). The
    /// log file is deleted once at build time when `deleteLogs` is set.
    /// Further sinks can still be added before [`build`](Self::build).
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Self::new()
            .active(config.execute_on_debug_settings())
            .flush_interval(config.flush_interval())
            .retry_policy(config.retry.clone())
            .panic_hook(config.panic_hook);

        if config.file_log {
            builder = builder.sink(FileSink::new(&config.log_file));
        }
        if config.console_log {
            let filter = if config.info_only {
                SinkFilter::InfoOnly
            } else {
                SinkFilter::All
            };
            builder = builder.filtered_sink(ConsoleSink::new(), filter);
        }
        if config.delete_logs {
            builder = builder.delete_on_start(&config.log_file);
        }

        Ok(builder)
    }

    /// Add a sink receiving every record
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(self, sink: S) -> Self {
        self.filtered_sink(sink, SinkFilter::All)
    }

    #[must_use = "builder methods return a new value"]
    pub fn filtered_sink<S: Sink + 'static>(mut self, sink: S, filter: SinkFilter) -> Self {
        self.sinks.push(SinkSlot::new(Box::new(sink), filter));
        self
    }

    /// Replace the wall clock, e.g. with a [`FixedClock`](super::clock::FixedClock)
    #[must_use = "builder methods return a new value"]
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// An inactive logger ignores every marker call
    #[must_use = "builder methods return a new value"]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Without the background loop, records stay buffered until
    /// [`Logger::flush`] or shutdown
    #[must_use = "builder methods return a new value"]
    pub fn background_flush(mut self, enabled: bool) -> Self {
        self.background_flush = enabled;
        self
    }

    /// Delete this file once when the logger is built
    #[must_use = "builder methods return a new value"]
    pub fn delete_on_start(mut self, path: impl Into<PathBuf>) -> Self {
        self.delete_on_start = Some(path.into());
        self
    }

    /// Install the emergency panic hook when the logger is built
    #[must_use = "builder methods return a new value"]
    pub fn panic_hook(mut self, enabled: bool) -> Self {
        self.panic_hook = enabled;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        if let Some(path) = &self.delete_on_start {
            delete_log_file(path)?;
        }

        let metrics = Arc::new(LoggerMetrics::new());
        if !self.active {
            return Ok(Logger {
                pipeline: None,
                clock: self.clock,
                metrics,
            });
        }

        let mut pipeline = DeliveryPipeline::new(self.sinks, self.retry, Arc::clone(&metrics));
        if self.background_flush {
            pipeline.start(self.flush_interval)?;
        }

        let logger = Logger {
            pipeline: Some(pipeline),
            clock: self.clock,
            metrics,
        };
        if self.panic_hook {
            logger.install_panic_hook();
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
