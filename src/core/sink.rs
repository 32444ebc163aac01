//! Sink trait for rendered log lines

use super::{call_kind::CallKind, error::Result};

/// A destination for rendered lines
pub trait Sink: Send + Sync {
    /// Write one line; the sink adds its own line terminator
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Which records a registered sink receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkFilter {
    #[default]
    All,
    /// Only `INFO` records
    InfoOnly,
}

impl SinkFilter {
    pub fn accepts(&self, kind: CallKind) -> bool {
        match self {
            SinkFilter::All => true,
            SinkFilter::InfoOnly => kind == CallKind::Info,
        }
    }
}
