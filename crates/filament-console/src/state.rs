/// Console state management.
///
/// Centralises everything the frontend tracks about the current scan. The
/// scan thread communicates via the event channel; state updates happen in
/// `process_scan_messages()`, which the run loop calls on every tick.
///
/// The index itself is never copied here: summaries and profile lookups go
/// straight to the engine's query API.
use filament_core::scanner::progress::{ScanComplete, ScanEvent};
use filament_core::scanner::ScanHandle;
use filament_core::{FilamentEngine, ScanConfig, ScanError};
use std::path::PathBuf;

/// The current phase of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No scan has been started.
    Idle,
    /// Events are still arriving.
    Scanning,
    /// The completion report has been received.
    Completed,
}

/// Maximum events drained per call.
///
/// Keeps one tick short even if the scanner produced a burst of skipped
/// files while the terminal was blocked.
const MAX_MESSAGES_PER_TICK: usize = 300;

/// Status shown if the scanner disappears without a completion report.
pub const STATUS_SCANNER_LOST: &str = "Scan complete - Error occurred during scan";

/// Maximum skipped paths remembered for the final report.
pub const MAX_SKIPPED: usize = 1_000;

/// One root as reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootStatus {
    pub slicer: String,
    pub path: PathBuf,
    pub found: bool,
}

pub struct ConsoleState {
    pub engine: FilamentEngine,
    pub phase: Phase,
    pub scan_handle: Option<ScanHandle>,
    /// Most recent status line.
    pub status: String,
    /// Every root the scanner checked, in order.
    pub roots: Vec<RootStatus>,
    /// Skipped directories and files (capped at [`MAX_SKIPPED`]).
    pub skipped: Vec<(PathBuf, String)>,
    /// Total skipped count, including any beyond the cap.
    pub skipped_count: usize,
    pub completion: Option<ScanComplete>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(FilamentEngine::new())
    }
}

impl ConsoleState {
    pub fn new(engine: FilamentEngine) -> Self {
        Self {
            engine,
            phase: Phase::Idle,
            scan_handle: None,
            status: String::new(),
            roots: Vec::new(),
            skipped: Vec::new(),
            skipped_count: 0,
            completion: None,
        }
    }

    /// Start a background scan, resetting per-scan state.
    ///
    /// Fails with [`ScanError::AlreadyRunning`] if a scan is in flight.
    pub fn start_scan(&mut self, config: ScanConfig) -> Result<(), ScanError> {
        let handle = self.engine.start_scan(config)?;

        self.phase = Phase::Scanning;
        self.status.clear();
        self.roots.clear();
        self.skipped.clear();
        self.skipped_count = 0;
        self.completion = None;
        self.scan_handle = Some(handle);
        Ok(())
    }

    /// Ask the running scan, if any, to stop after its current batch. The
    /// scan still reports a completion.
    pub fn cancel_scan(&self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Drain pending scan events and return the status lines among them,
    /// in arrival order, for the caller to print.
    pub fn process_scan_messages(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        let handle = match &self.scan_handle {
            Some(h) => h,
            None => return lines,
        };

        let mut drained = 0usize;
        while drained < MAX_MESSAGES_PER_TICK {
            let event = match handle.events_rx.try_recv() {
                Ok(e) => e,
                Err(err) if err.is_disconnected() => {
                    // Scanner thread is gone without a report.
                    tracing::error!("Scan channel closed before completion");
                    self.status = STATUS_SCANNER_LOST.to_string();
                    lines.push(self.status.clone());
                    self.phase = Phase::Completed;
                    self.scan_handle = None;
                    return lines;
                }
                Err(_) => break,
            };
            drained += 1;

            match event {
                ScanEvent::Status(message) => {
                    self.status = message.clone();
                    lines.push(message);
                }
                ScanEvent::RootChecked {
                    slicer,
                    path,
                    found,
                } => {
                    self.roots.push(RootStatus {
                        slicer: slicer.to_string(),
                        path,
                        found,
                    });
                }
                ScanEvent::Skipped { path, message } => {
                    self.skipped_count += 1;
                    if self.skipped.len() < MAX_SKIPPED {
                        self.skipped.push((path, message));
                    }
                }
                ScanEvent::Complete(complete) => {
                    self.status = complete.status.clone();
                    self.completion = Some(complete);
                    self.phase = Phase::Completed;
                    self.scan_handle = None;
                    return lines;
                }
            }
        }

        lines
    }
}
