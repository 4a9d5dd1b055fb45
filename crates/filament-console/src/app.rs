/// Console run loop.
///
/// Starts one scan, prints status lines as they arrive, then prints the
/// summary (text or JSON) and writes an optional CSV export.
use crate::report;
use crate::state::{ConsoleState, Phase};
use anyhow::Context;
use filament_core::analysis::export;
use filament_core::scanner::progress::ScanOutcome;
use filament_core::{FilamentEngine, ScanConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the run loop drains scan events.
const TICK: Duration = Duration::from_millis(20);

/// Output style for the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Status lines, breakdown tables and the file list.
    #[default]
    Text,
    /// The summary object as JSON only (status lines go to the log).
    Json,
}

#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub config: ScanConfig,
    pub format: OutputFormat,
    /// Write the file listing as CSV here after the scan.
    pub csv_path: Option<PathBuf>,
    /// Set from outside (Ctrl-C) to cancel the running scan.
    pub interrupt: Arc<AtomicBool>,
}

impl ConsoleOptions {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            format: OutputFormat::default(),
            csv_path: None,
            interrupt: Arc::default(),
        }
    }
}

/// Run one scan to completion and render the results to `out`.
///
/// Returns the scan outcome so the binary can pick an exit code.
pub fn run<W: Write>(options: ConsoleOptions, out: &mut W) -> anyhow::Result<ScanOutcome> {
    let mut state = ConsoleState::new(FilamentEngine::new());
    state
        .start_scan(options.config)
        .context("failed to start filament scan")?;

    let mut cancel_sent = false;
    while state.phase == Phase::Scanning {
        if !cancel_sent && options.interrupt.load(Ordering::SeqCst) {
            tracing::info!("Interrupted, cancelling scan");
            state.cancel_scan();
            cancel_sent = true;
        }
        for line in state.process_scan_messages() {
            match options.format {
                OutputFormat::Text => writeln!(out, "{line}")?,
                OutputFormat::Json => tracing::info!("{line}"),
            }
        }
        if state.phase == Phase::Scanning {
            std::thread::sleep(TICK);
        }
    }

    let outcome = state
        .completion
        .as_ref()
        .map(|c| c.outcome)
        .unwrap_or(ScanOutcome::Failed);
    let summary = state.engine.get_summary();

    match options.format {
        OutputFormat::Text => {
            writeln!(out)?;
            if let Some(ref complete) = state.completion {
                write!(
                    out,
                    "{}",
                    report::render_completion(complete, &state.skipped, state.skipped_count)
                )?;
                writeln!(out)?;
            }
            write!(out, "{}", report::render_summary(&summary))?;
        }
        OutputFormat::Json => export::write_json(&summary, &mut *out)?,
    }

    if let Some(path) = options.csv_path {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::write_files_csv(&summary, BufWriter::new(file))
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = summary.files.len(), "Wrote CSV export");
    }

    out.flush()?;
    Ok(outcome)
}
