//! Buffered delivery of call records
//!
//! Marker calls push records into a shared buffer. A background thread wakes
//! every flush interval, swaps the buffer out for an empty one and writes
//! the swapped generation to the sinks. Records pushed during a drain land
//! in the next generation.
//!
//! Nothing in here logs through the logger. Write failures are retried
//! according to the [`RetryPolicy`] and then counted as dropped.

use super::{
    call_record::CallRecord,
    error::{LoggerError, Result},
    line_format::LineFormatter,
    metrics::LoggerMetrics,
    retry::{RetryPolicy, DELAYED_MARKER},
    sink::{Sink, SinkFilter},
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

thread_local! {
    static DRAINING: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside a drain
pub(crate) fn in_drain() -> bool {
    DRAINING.with(Cell::get)
}

struct DrainGuard;

impl DrainGuard {
    fn enter() -> Self {
        DRAINING.with(|d| d.set(true));
        DrainGuard
    }
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        DRAINING.with(|d| d.set(false));
    }
}

/// A sink together with the records it accepts
pub struct SinkSlot {
    sink: Box<dyn Sink>,
    filter: SinkFilter,
}

impl SinkSlot {
    pub fn new(sink: Box<dyn Sink>, filter: SinkFilter) -> Self {
        Self { sink, filter }
    }

    pub fn filter(&self) -> SinkFilter {
        self.filter
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }
}

struct Shared {
    buffer: Mutex<Vec<CallRecord>>,
    /// Held for the whole drain so generations are written in order
    sinks: Mutex<Vec<SinkSlot>>,
    retry: RetryPolicy,
    metrics: Arc<LoggerMetrics>,
}

impl Shared {
    fn enqueue(&self, record: CallRecord) {
        self.buffer.lock().push(record);
        self.metrics.record_enqueued();
    }

    fn drain(&self) -> usize {
        let mut sinks = self.sinks.lock();
        self.drain_into(&mut sinks)
    }

    /// Drain unless another drain holds the sinks for longer than `wait`
    fn try_drain_for(&self, wait: Duration) -> Option<usize> {
        let mut sinks = self.sinks.try_lock_for(wait)?;
        Some(self.drain_into(&mut sinks))
    }

    fn drain_into(&self, sinks: &mut [SinkSlot]) -> usize {
        let _guard = DrainGuard::enter();
        self.metrics.record_drain();

        let generation = std::mem::take(&mut *self.buffer.lock());
        for record in &generation {
            let rendered = catch_unwind(AssertUnwindSafe(|| LineFormatter::format(record)));
            let Ok(line) = rendered else {
                self.metrics.record_dropped();
                continue;
            };

            for slot in sinks.iter_mut() {
                if slot.filter.accepts(record.kind()) {
                    self.deliver(slot, &line);
                }
            }
        }

        for slot in sinks.iter_mut() {
            let _ = catch_unwind(AssertUnwindSafe(|| slot.sink.flush()));
        }

        generation.len()
    }

    /// Write one line, retrying with backoff; each retry tags the line
    fn deliver(&self, slot: &mut SinkSlot, line: &str) {
        let mut line = line.to_string();
        let mut attempt = 0;

        loop {
            let written = catch_unwind(AssertUnwindSafe(|| slot.sink.write_line(&line)));
            match written {
                Ok(Ok(())) => {
                    self.metrics.record_written();
                    return;
                }
                _ if attempt < self.retry.max_retries => {
                    thread::sleep(self.retry.delay_for(attempt));
                    attempt += 1;
                    self.metrics.record_retried();
                    line.push_str(DELAYED_MARKER);
                }
                _ => {
                    self.metrics.record_dropped();
                    return;
                }
            }
        }
    }
}

/// Weak reference used by the panic hook so it does not keep the pipeline alive
#[derive(Clone)]
pub(crate) struct PipelineHandle {
    shared: Weak<Shared>,
}

impl PipelineHandle {
    /// Enqueue a final record and drain synchronously. Returns `false` when
    /// the pipeline is gone or a drain is stuck on this or another thread.
    pub(crate) fn emergency_flush(&self, record: CallRecord, wait: Duration) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        shared.enqueue(record);
        if in_drain() {
            return false;
        }
        shared.try_drain_for(wait).is_some()
    }
}

pub struct DeliveryPipeline {
    shared: Arc<Shared>,
    stop: Option<Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl DeliveryPipeline {
    /// Create an idle pipeline; nothing is drained until [`start`](Self::start)
    /// or an explicit [`drain`](Self::drain)
    pub fn new(sinks: Vec<SinkSlot>, retry: RetryPolicy, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            shared: Arc::new(Shared {
                buffer: Mutex::new(Vec::new()),
                sinks: Mutex::new(sinks),
                retry,
                metrics,
            }),
            stop: None,
            worker: None,
        }
    }

    /// Start the background flush loop
    pub fn start(&mut self, interval: Duration) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let shared = Arc::clone(&self.shared);

        let handle = thread::Builder::new()
            .name("callsite-logger-flush".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        shared.drain();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        shared.drain();
                        break;
                    }
                }
            })
            .map_err(|e| {
                LoggerError::io_operation("starting flush thread", "cannot spawn thread", e)
            })?;

        self.stop = Some(stop_tx);
        self.worker = Some(handle);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Append a record to the current generation. Never blocks on I/O.
    pub fn enqueue(&self, record: CallRecord) {
        self.shared.enqueue(record);
    }

    /// Number of records waiting for the next drain
    pub fn pending(&self) -> usize {
        self.shared.buffer.lock().len()
    }

    /// Drain the current generation on the calling thread
    ///
    /// Returns the number of records taken from the buffer. An empty buffer
    /// performs no writes.
    pub fn drain(&self) -> usize {
        self.shared.drain()
    }

    pub(crate) fn handle(&self) -> PipelineHandle {
        PipelineHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Stop the flush loop after a final drain
    ///
    /// Returns `true` if the worker finished within `timeout`. Without a
    /// running worker the buffer is drained on the calling thread, unless a
    /// worker abandoned by an earlier timed out shutdown still holds the
    /// sinks for longer than `timeout`.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.stop.take());

        let Some(handle) = self.worker.take() else {
            return self.shared.try_drain_for(timeout).is_some();
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Flush thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Flush thread did not finish within {:?}. \
                     Some lines may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(5));
        }
    }
}
