//! Upload progress tracking.
//!
//! A [`ProgressTracker`] turns a stream of byte counts into at most a dozen
//! progress events: one per 10% step plus a final one when the last byte is
//! read. [`ProgressReader`] feeds it from any [`Read`] implementation.
//!
//! The byte counter is atomic because the object store may drain the reader
//! from its own I/O thread. Gating and emission share one lock so observers
//! see percentages in order.

use std::io::{self, Read};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Minimum distance in percentage points between two non-final events.
pub const STEP_PERCENT: u8 = 10;

/// A single threshold-crossing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub percent: u8,
    pub transferred: u64,
    pub total: u64,
}

impl ProgressEvent {
    /// `true` for the event fired when the last byte has been read.
    pub fn is_complete(&self) -> bool {
        self.transferred == self.total
    }
}

/// Callback receiving progress events in addition to the log line.
pub type ProgressObserver = dyn Fn(&ProgressEvent) + Send + Sync;

#[derive(Debug, Default)]
struct Emitted {
    percent: u8,
    completed: bool,
}

/// Accumulates transferred bytes for one upload and emits gated events.
pub struct ProgressTracker {
    total: u64,
    transferred: AtomicU64,
    emitted: Mutex<Emitted>,
    observer: Option<Arc<ProgressObserver>>,
}

impl ProgressTracker {
    /// Create a tracker for `total` bytes. A zero total makes it inert:
    /// percentages are undefined, so nothing is recorded or emitted.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            transferred: AtomicU64::new(0),
            emitted: Mutex::new(Emitted::default()),
            observer: None,
        }
    }

    /// Forward every emitted event to `observer` as well.
    pub fn with_observer(mut self, observer: Arc<ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn is_inert(&self) -> bool {
        self.total == 0
    }

    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::Acquire)
    }

    pub fn last_emitted(&self) -> u8 {
        self.emitted().percent
    }

    fn emitted(&self) -> MutexGuard<'_, Emitted> {
        self.emitted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `n` more bytes read from the artifact.
    pub fn record_bytes(&self, n: u64) {
        if n == 0 || self.is_inert() {
            return;
        }
        let total = self.total;
        let previous = match self
            .transferred
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                Some(cur.saturating_add(n).min(total))
            }) {
            Ok(prev) | Err(prev) => prev,
        };
        let current = previous.saturating_add(n).min(total);
        let percent = percent_of(current, total);

        let mut emitted = self.emitted();
        if emitted.completed {
            return;
        }
        if current == total {
            // The terminal event fires once, however close it is to the last one.
            emitted.completed = true;
        } else if u16::from(percent) < u16::from(emitted.percent) + u16::from(STEP_PERCENT) {
            return;
        }
        emitted.percent = percent;
        self.emit(percent, current);
    }

    fn emit(&self, percent: u8, transferred: u64) {
        tracing::info!(
            "Upload progress: {percent}% ({transferred}/{} bytes)",
            self.total
        );
        if let Some(observer) = &self.observer {
            observer(&ProgressEvent {
                percent,
                transferred,
                total: self.total,
            });
        }
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total", &self.total)
            .field("transferred", &self.transferred())
            .field("last_emitted", &self.last_emitted())
            .finish_non_exhaustive()
    }
}

fn percent_of(current: u64, total: u64) -> u8 {
    let pct = (u128::from(current) * 100 / u128::from(total)).min(100);
    pct as u8
}

/// Reader adapter that reports every successful read to a shared tracker.
#[derive(Debug)]
pub struct ProgressReader<R> {
    inner: R,
    tracker: Arc<ProgressTracker>,
}

impl<R> ProgressReader<R> {
    pub fn new(inner: R, tracker: Arc<ProgressTracker>) -> Self {
        Self { inner, tracker }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.tracker.record_bytes(n as u64);
        }
        Ok(n)
    }
}
