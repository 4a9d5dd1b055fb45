/// Scanner module — orchestrates one end-to-end filament scan.
///
/// - [`discovery`] walks a slicer root for `filament/base/*.json` candidates.
/// - [`loader`] reads and parses one candidate.
/// - [`run`] sequences resolution, discovery and loading into the index.
/// - [`progress`] defines the event stream and status text.
///
/// The scan writes into a **shared index** (`Arc<RwLock<FilamentIndex>>`)
/// batch by batch, so the frontend can query a partially populated index
/// while the scan is running.
pub mod discovery;
pub mod loader;
pub mod progress;
pub mod run;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::model::SharedIndex;
use crossbeam_channel::{Receiver, Sender};
use progress::{ScanComplete, ScanEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::debug;

/// Maximum number of events that may queue up in the channel.
///
/// A scan emits a handful of status lines plus one event per root and per
/// skipped path, so this is only reached when a frontend stops draining.
/// The scanner then blocks rather than consuming unbounded heap.
pub const EVENT_CHANNEL_CAPACITY: usize = 4_096;

/// Proof that the caller owns the single scan slot for an index.
///
/// Acquired with a compare-and-swap on a shared flag and released on drop,
/// including when the scan thread unwinds or never starts.
#[derive(Debug)]
pub struct ScanGuard {
    flag: Arc<AtomicBool>,
}

impl ScanGuard {
    /// Claim the slot, or `None` if a scan already holds it.
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Handle to a running or completed scan. Allows cancellation and
/// receiving events.
pub struct ScanHandle {
    /// Receiver for events from the scan thread.
    pub events_rx: Receiver<ScanEvent>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop after the batch in flight.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Run a scan on the calling thread and send the terminal `Complete` event.
///
/// The guard is released before `Complete` goes out, so a frontend reacting
/// to completion can immediately start the next scan.
pub fn execute(
    config: &ScanConfig,
    index: &SharedIndex,
    events: &Sender<ScanEvent>,
    cancel_flag: &AtomicBool,
    guard: ScanGuard,
) -> ScanComplete {
    let complete = run::run_scan(config, index, events, cancel_flag);
    drop(guard);
    let _ = events.send(ScanEvent::Complete(complete.clone()));
    complete
}

/// Start a new scan on a background thread.
///
/// Returns a `ScanHandle` for receiving events and requesting cancellation.
/// The guard moves into the thread and is released when the scan ends.
pub fn start_scan(
    config: ScanConfig,
    index: SharedIndex,
    guard: ScanGuard,
) -> Result<ScanHandle, ScanError> {
    let (events_tx, events_rx) = crossbeam_channel::bounded::<ScanEvent>(EVENT_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("filament-scanner".into())
        .spawn(move || {
            debug!("Scanner thread started");
            execute(&config, &index, &events_tx, &cancel_clone, guard);
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        events_rx,
        cancel_flag,
        _thread: Some(thread),
    })
}
