/// End-to-end tests for the console frontend.
///
/// These exercise `ConsoleState` and `run` against real temporary slicer
/// trees, without a terminal: output is captured into a `Vec<u8>`.
use filament_console::state::{ConsoleState, Phase};
use filament_console::{run, ConsoleOptions, OutputFormat};
use filament_core::platform::{PathEnvironment, Platform};
use filament_core::scanner::progress::ScanOutcome;
use filament_core::{FilamentEngine, ScanConfig, ScanError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config_for(home: &Path) -> ScanConfig {
    ScanConfig::new(Platform::Linux, PathEnvironment::with_home(home.to_path_buf()))
}

fn write_profile(home: &Path, slicer: &str, subdir: &str, file: &str, body: &str) {
    let dir = home
        .join(".config")
        .join(slicer)
        .join("user")
        .join(subdir)
        .join("filament")
        .join("base");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), body).unwrap();
}

fn make_temp_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_profile(tmp.path(), "BambuStudio", "default", "pla.json", r#"{"name": "PLA Red"}"#);
    write_profile(tmp.path(), "OrcaSlicer", "default", "id.json", r#"{"filament_id": "abc"}"#);
    write_profile(tmp.path(), "OrcaSlicer", "default", "bad.json", "{");
    tmp
}

/// Pump `process_scan_messages()` until the phase leaves `Scanning` or the
/// deadline expires. Returns every status line seen.
fn pump_until_done(state: &mut ConsoleState) -> Vec<String> {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut lines = Vec::new();
    while state.phase == Phase::Scanning {
        assert!(
            std::time::Instant::now() < deadline,
            "scan did not complete within 30 seconds"
        );
        lines.extend(state.process_scan_messages());
        std::thread::sleep(Duration::from_millis(10));
    }
    lines
}

// ── ConsoleState ──────────────────────────────────────────────────────────────

#[test]
fn new_state_is_idle() {
    let state = ConsoleState::default();
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.completion.is_none());
}

#[test]
fn start_scan_sets_scanning_phase() {
    let tmp = make_temp_tree();
    let mut state = ConsoleState::default();
    state.start_scan(config_for(tmp.path())).unwrap();
    assert_eq!(state.phase, Phase::Scanning);
    pump_until_done(&mut state);
}

#[test]
fn scan_completes_with_report_and_skips() {
    let tmp = make_temp_tree();
    let mut state = ConsoleState::default();
    state.start_scan(config_for(tmp.path())).unwrap();
    let lines = pump_until_done(&mut state);

    assert_eq!(state.phase, Phase::Completed);
    let complete = state.completion.as_ref().expect("completion report");
    assert_eq!(complete.total_files, 2);
    assert_eq!(complete.files_found, 3);
    assert_eq!(state.skipped_count, 1);
    assert!(state.skipped[0].0.ends_with("bad.json"));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("Scan complete - Loaded 2 of 3 filament files from BambuStudio, OrcaSlicer")
    );
    assert_eq!(state.status, complete.status);
}

#[test]
fn roots_are_recorded_in_order() {
    let tmp = TempDir::new().unwrap();
    write_profile(tmp.path(), "OrcaSlicer", "default", "a.json", "{}");

    let mut state = ConsoleState::default();
    state.start_scan(config_for(tmp.path())).unwrap();
    pump_until_done(&mut state);

    let roots: Vec<(&str, bool)> = state
        .roots
        .iter()
        .map(|r| (r.slicer.as_str(), r.found))
        .collect();
    assert_eq!(roots, vec![("BambuStudio", false), ("OrcaSlicer", true)]);
}

/// Two consoles sharing one engine cannot scan at the same time.
#[test]
fn shared_engine_rejects_overlapping_scans() {
    let tmp = make_temp_tree();
    let engine = FilamentEngine::new();
    let mut first = ConsoleState::new(engine.clone());
    let mut second = ConsoleState::new(engine);

    first.start_scan(config_for(tmp.path())).unwrap();
    match second.start_scan(config_for(tmp.path())) {
        Err(ScanError::AlreadyRunning) => assert_eq!(second.phase, Phase::Idle),
        // First scan already finished; both are allowed to run in sequence.
        Ok(()) => {
            pump_until_done(&mut second);
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
    pump_until_done(&mut first);
}

/// Cancelling marks the live handle at once; the scan still reports.
#[test]
fn cancel_scan_flags_handle_and_scan_still_completes() {
    let tmp = TempDir::new().unwrap();
    for i in 0..200 {
        write_profile(tmp.path(), "OrcaSlicer", "default", &format!("p{i:03}.json"), "{}");
    }

    let mut state = ConsoleState::default();
    state.start_scan(config_for(tmp.path())).unwrap();
    state.cancel_scan();
    assert_eq!(
        state.scan_handle.as_ref().map(|h| h.is_cancelled()),
        Some(true)
    );

    let lines = pump_until_done(&mut state);
    let complete = state.completion.as_ref().expect("completion report");
    assert!(matches!(
        complete.outcome,
        ScanOutcome::Cancelled | ScanOutcome::Completed
    ));
    assert_eq!(complete.total_files, state.engine.get_profile_count());
    assert_eq!(lines.last(), Some(&complete.status));
}

// ── run ───────────────────────────────────────────────────────────────────────

#[test]
fn text_run_prints_status_and_summary() {
    let tmp = make_temp_tree();
    let mut out = Vec::new();
    let outcome = run(
        ConsoleOptions {
            config: config_for(tmp.path()),
            format: OutputFormat::Text,
            csv_path: None,
            interrupt: Default::default(),
        },
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome, ScanOutcome::Completed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Scanning for slicer directories...\n"));
    assert!(text.contains("Found OrcaSlicer directory, scanning for filament data..."));
    assert!(text.contains("Profiles: 2"));
    assert!(text.contains("PLA Red"));
    assert!(text.contains("Skipped 1:"));
}

#[test]
fn json_run_prints_only_summary() {
    let tmp = make_temp_tree();
    let mut out = Vec::new();
    run(
        ConsoleOptions {
            config: config_for(tmp.path()),
            format: OutputFormat::Json,
            csv_path: None,
            interrupt: Default::default(),
        },
        &mut out,
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("stdout is pure JSON");
    assert_eq!(value["totalFiles"], 2);
    assert_eq!(value["bySource"]["BambuStudio"], 1);
    assert_eq!(value["bySubdirectory"]["OrcaSlicer/default"], 1);
}

#[test]
fn csv_export_is_written() {
    let tmp = make_temp_tree();
    let csv_path = tmp.path().join("profiles.csv");
    let mut out = Vec::new();
    run(
        ConsoleOptions {
            config: config_for(tmp.path()),
            format: OutputFormat::Text,
            csv_path: Some(csv_path.clone()),
            interrupt: Default::default(),
        },
        &mut out,
    )
    .unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3, "header plus two profiles");
    assert!(lines[1].starts_with("BambuStudio/default/pla.json,"));
}

#[test]
fn empty_home_reports_no_slicers() {
    let tmp = TempDir::new().unwrap();
    let mut out = Vec::new();
    let outcome = run(
        ConsoleOptions {
            config: config_for(tmp.path()),
            format: OutputFormat::Text,
            csv_path: None,
            interrupt: Default::default(),
        },
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome, ScanOutcome::Completed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Scan complete - No slicer directories found"));
    assert!(text.contains("Profiles: 0"));
}

/// A raised interrupt flag cancels the scan; the run still ends with a
/// terminal status and summary.
#[test]
fn interrupted_run_still_reports() {
    let tmp = make_temp_tree();
    let mut options = ConsoleOptions::new(config_for(tmp.path()));
    options.interrupt.store(true, std::sync::atomic::Ordering::SeqCst);

    let mut out = Vec::new();
    let outcome = run(options, &mut out).unwrap();

    assert!(matches!(
        outcome,
        ScanOutcome::Cancelled | ScanOutcome::Completed
    ));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Scan cancelled - ") || text.contains("Scan complete - "));
    assert!(text.contains("Profiles: "));
}
