//! Core logger types and traits

pub mod call_kind;
pub mod call_record;
pub mod call_site;
pub mod clock;
pub mod config;
pub mod error;
pub mod line_format;
pub mod logger;
pub mod metrics;
pub mod pipeline;
pub mod resolver;
pub mod retry;
pub mod sink;

pub use call_kind::CallKind;
pub use call_record::CallRecord;
pub use call_site::{Argument, CallSite, Param};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use line_format::LineFormatter;
pub use logger::{Logger, LoggerBuilder, DEFAULT_FLUSH_INTERVAL, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use pipeline::{DeliveryPipeline, SinkSlot};
pub use resolver::{CallerMethod, CallerResolver};
pub use retry::{RetryPolicy, DELAYED_MARKER};
pub use sink::{Sink, SinkFilter};
