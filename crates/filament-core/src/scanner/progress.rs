/// Scan events — lightweight messages sent from the scan thread to the
/// frontend via a crossbeam channel.
///
/// The loaded profiles themselves are in the shared index; these messages
/// carry only status text, per-root results, skipped paths and the final
/// completion report.
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Status text shown while roots are being resolved.
pub const STATUS_SCANNING: &str = "Scanning for slicer directories...";

/// Status text for a platform with no known slicer layout.
pub const STATUS_PLATFORM_UNSUPPORTED: &str = "Platform not supported";

/// Events emitted by a scan, in order. `Complete` is always last and is
/// sent exactly once per scan.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Human-readable progress line.
    Status(String),
    /// A slicer root was checked for existence.
    RootChecked {
        slicer: CompactString,
        path: PathBuf,
        found: bool,
    },
    /// A directory could not be listed or a file could not be loaded.
    /// Non-fatal; the scan carries on.
    Skipped { path: PathBuf, message: String },
    /// Terminal report.
    Complete(ScanComplete),
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanOutcome {
    Completed,
    Cancelled,
    /// An unexpected failure abandoned the walk. The index keeps whatever
    /// was loaded before it.
    Failed,
}

/// Running totals for one scan. Only the scan thread mutates these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTotals {
    /// Candidate files discovered.
    pub files_found: usize,
    /// Candidates successfully loaded into the index.
    pub files_loaded: usize,
    /// Names of slicer roots that exist, in resolution order.
    pub found_slicers: Vec<String>,
}

/// Final report of a scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanComplete {
    /// Files loaded during this scan.
    pub total_files: usize,
    /// Candidate files discovered during this scan.
    pub files_found: usize,
    pub found_slicers: Vec<String>,
    /// Every key in the index when the scan finished.
    pub filament_keys: Vec<String>,
    pub outcome: ScanOutcome,
    /// The final status line (also sent as the last `Status` event).
    pub status: String,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

/// Status text announcing a slicer root that exists.
pub fn found_root_message(slicer: &str) -> String {
    format!("Found {slicer} directory, scanning for filament data...")
}

/// Final status line for a scan.
pub fn completion_message(outcome: ScanOutcome, totals: &ScanTotals) -> String {
    match outcome {
        ScanOutcome::Failed => "Scan complete - Error occurred during scan".to_string(),
        ScanOutcome::Cancelled => format!(
            "Scan cancelled - Loaded {} of {} filament files",
            totals.files_loaded, totals.files_found
        ),
        ScanOutcome::Completed if totals.found_slicers.is_empty() => {
            "Scan complete - No slicer directories found".to_string()
        }
        ScanOutcome::Completed if totals.files_found == 0 => format!(
            "Scan complete - Found {} but no matching filament files",
            totals.found_slicers.join(", ")
        ),
        ScanOutcome::Completed => format!(
            "Scan complete - Loaded {} of {} filament files from {}",
            totals.files_loaded,
            totals.files_found,
            totals.found_slicers.join(", ")
        ),
    }
}
