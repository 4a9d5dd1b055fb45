/// The scan walk: resolve roots, discover candidates, load them in batches
/// and insert them into the shared index.
///
/// # Batching
///
/// Candidates are buffered into a local `Vec` and each one is spawned onto a
/// bounded rayon pool. Results come back over a channel tagged with their
/// position, so they are applied in discovery order and inserted under a
/// **single write lock per batch**. Readers only ever wait for one short
/// insertion burst and two candidates with the same key are always applied
/// in discovery order.
///
/// # Read timeout
///
/// With `read_timeout` set, the scan thread waits at most that long for a
/// batch. Files still outstanding at the deadline are skipped as timed out;
/// a read stalled on a dead network share ties up one pool worker until the
/// OS gives up, but never the scan.
///
/// The found/loaded counters live on this thread only and are updated in
/// the same step as the batch insert, so they never disagree with the index.
use crate::config::ScanConfig;
use crate::error::{LoadError, ScanError};
use crate::model::{ProfileEntry, SharedIndex};
use crate::platform::{resolve_slicer_roots, SlicerRoot};
use crate::scanner::discovery::{self, CandidateFile};
use crate::scanner::loader;
use crate::scanner::progress::{
    completion_message, found_root_message, ScanComplete, ScanEvent, ScanOutcome, ScanTotals,
    STATUS_PLATFORM_UNSUPPORTED, STATUS_SCANNING,
};
use crossbeam_channel::Sender;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Number of candidates parsed together before one index insert.
///
/// Profile files are small (a few KB); 64 keeps the pool busy without
/// holding the write lock long enough to stall a reader.
pub const LOAD_BATCH_SIZE: usize = 64;

/// How the walk ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkEnd {
    /// Every root was visited.
    Finished,
    /// The cancel flag stopped the walk before it ran out of work.
    Stopped,
}

/// Run one complete scan on the calling thread.
///
/// Sends `Status`, `RootChecked` and `Skipped` events as it goes, ending
/// with the final status line, and returns the completion report. It does
/// **not** send `ScanEvent::Complete`; the caller does that once it has
/// released the single-scan guard.
///
/// Never fails: unexpected errors and panics inside the walk become a
/// `Failed` outcome and the index keeps whatever was inserted before them.
pub fn run_scan(
    config: &ScanConfig,
    index: &SharedIndex,
    events: &Sender<ScanEvent>,
    cancel_flag: &AtomicBool,
) -> ScanComplete {
    run_with(config, index, events, |totals| {
        walk(config, index, events, cancel_flag, totals)
    })
}

/// Shared framing around a walk: index policy, failure capture, the final
/// status line and the completion report.
fn run_with<W>(
    config: &ScanConfig,
    index: &SharedIndex,
    events: &Sender<ScanEvent>,
    walker: W,
) -> ScanComplete
where
    W: FnOnce(&mut ScanTotals) -> Result<WalkEnd, ScanError>,
{
    let start = Instant::now();
    info!(
        platform = config.platform.label(),
        slicers = ?config.slicers,
        "Starting filament scan"
    );

    if config.clear_before_scan {
        index.write().clear();
    }

    let mut totals = ScanTotals::default();
    let result = panic::catch_unwind(AssertUnwindSafe(|| walker(&mut totals)));

    let outcome = match result {
        Ok(Ok(WalkEnd::Finished)) => ScanOutcome::Completed,
        Ok(Ok(WalkEnd::Stopped)) => ScanOutcome::Cancelled,
        Ok(Err(err)) => {
            error!(error = %err, "Filament scan failed");
            ScanOutcome::Failed
        }
        Err(payload) => {
            let err = ScanError::Panicked(panic_message(payload.as_ref()));
            error!(error = %err, "Filament scan panicked");
            ScanOutcome::Failed
        }
    };

    let status = completion_message(outcome, &totals);
    let _ = events.send(ScanEvent::Status(status.clone()));

    let duration = start.elapsed();
    info!(
        found = totals.files_found,
        loaded = totals.files_loaded,
        slicers = ?totals.found_slicers,
        ?outcome,
        ?duration,
        "Filament scan finished"
    );

    ScanComplete {
        total_files: totals.files_loaded,
        files_found: totals.files_found,
        found_slicers: totals.found_slicers,
        filament_keys: index.read().keys(),
        outcome,
        status,
        duration,
        completed_at: chrono::Utc::now(),
    }
}

fn walk(
    config: &ScanConfig,
    index: &SharedIndex,
    events: &Sender<ScanEvent>,
    cancel_flag: &AtomicBool,
    totals: &mut ScanTotals,
) -> Result<WalkEnd, ScanError> {
    let _ = events.send(ScanEvent::Status(STATUS_SCANNING.to_string()));

    let roots = resolve_slicer_roots(config.platform, &config.environment, &config.slicers);
    if roots.is_empty() {
        warn!(platform = config.platform.label(), "No slicer roots for this platform");
        let _ = events.send(ScanEvent::Status(STATUS_PLATFORM_UNSUPPORTED.to_string()));
        return Ok(WalkEnd::Finished);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.load_parallelism.max(1))
        .thread_name(|idx| format!("filament-load-{idx}"))
        .panic_handler(|payload| {
            error!(panic = %panic_message(payload.as_ref()), "Profile loader panicked");
        })
        .build()
        .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

    for root in &roots {
        if cancel_flag.load(Ordering::Relaxed) {
            return Ok(WalkEnd::Stopped);
        }
        if scan_root(root, config, &pool, index, events, cancel_flag, totals) == WalkEnd::Stopped {
            return Ok(WalkEnd::Stopped);
        }
    }

    Ok(WalkEnd::Finished)
}

/// Check one root and load everything under it.
fn scan_root(
    root: &SlicerRoot,
    config: &ScanConfig,
    pool: &rayon::ThreadPool,
    index: &SharedIndex,
    events: &Sender<ScanEvent>,
    cancel_flag: &AtomicBool,
    totals: &mut ScanTotals,
) -> WalkEnd {
    let found = discovery::root_exists(root);
    let _ = events.send(ScanEvent::RootChecked {
        slicer: root.name.clone(),
        path: root.root_path.clone(),
        found,
    });
    if !found {
        debug!(slicer = %root.name, path = %root.root_path.display(), "Slicer root not found");
        return WalkEnd::Finished;
    }

    info!(slicer = %root.name, path = %root.root_path.display(), "Found slicer root");
    totals.found_slicers.push(root.name.to_string());
    let _ = events.send(ScanEvent::Status(found_root_message(&root.name)));

    let mut pending: Vec<CandidateFile> = Vec::with_capacity(LOAD_BATCH_SIZE);
    for item in discovery::discover_candidates(root) {
        match item {
            Ok(candidate) => {
                totals.files_found += 1;
                pending.push(candidate);
                if pending.len() >= LOAD_BATCH_SIZE {
                    load_batch(&mut pending, config, pool, index, events, totals);
                    if cancel_flag.load(Ordering::Relaxed) {
                        return WalkEnd::Stopped;
                    }
                }
            }
            Err(err) => {
                warn!(path = %err.path().display(), error = %err, "Skipping unreadable directory");
                let _ = events.send(ScanEvent::Skipped {
                    path: err.path().to_path_buf(),
                    message: err.to_string(),
                });
            }
        }
    }
    load_batch(&mut pending, config, pool, index, events, totals);
    WalkEnd::Finished
}

/// Load `pending` on the pool and insert the successes under one write lock.
fn load_batch(
    pending: &mut Vec<CandidateFile>,
    config: &ScanConfig,
    pool: &rayon::ThreadPool,
    index: &SharedIndex,
    events: &Sender<ScanEvent>,
    totals: &mut ScanTotals,
) {
    if pending.is_empty() {
        return;
    }

    let (tx, rx) = crossbeam_channel::bounded(pending.len());
    for (slot, candidate) in pending.iter().cloned().enumerate() {
        let tx = tx.clone();
        pool.spawn(move || {
            let _ = tx.send((slot, loader::load_profile(&candidate)));
        });
    }
    drop(tx);

    let deadline = config.read_timeout.map(|timeout| Instant::now() + timeout);
    let mut slots: Vec<Option<Result<ProfileEntry, LoadError>>> =
        pending.iter().map(|_| None).collect();
    let mut outstanding = slots.len();
    while outstanding > 0 {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline).ok(),
            None => rx.recv().ok(),
        };
        let Some((slot, result)) = received else {
            break;
        };
        slots[slot] = Some(result);
        outstanding -= 1;
    }

    let mut loaded: Vec<ProfileEntry> = Vec::with_capacity(slots.len());
    for (candidate, slot) in pending.drain(..).zip(slots) {
        let result = slot.unwrap_or_else(|| Err(unfinished(&candidate, config)));
        match result {
            Ok(entry) => loaded.push(entry),
            Err(err) => {
                warn!(path = %err.path().display(), error = %err, "Skipping filament file");
                let _ = events.send(ScanEvent::Skipped {
                    path: err.path().to_path_buf(),
                    message: err.to_string(),
                });
            }
        }
    }

    let mut idx = index.write();
    totals.files_loaded += loaded.len();
    for entry in loaded {
        if let Some(previous) = idx.insert(entry) {
            debug!(key = %previous.key, "Replaced existing profile");
        }
    }
}

/// Error for a candidate whose load never reported back.
fn unfinished(candidate: &CandidateFile, config: &ScanConfig) -> LoadError {
    match config.read_timeout {
        Some(timeout) => LoadError::TimedOut {
            path: candidate.path.clone(),
            timeout,
        },
        None => LoadError::Read {
            path: candidate.path.clone(),
            source: io::Error::other("loader stopped before reporting a result"),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
