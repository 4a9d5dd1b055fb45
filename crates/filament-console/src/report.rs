/// Text rendering of scan results.
///
/// Pure string builders so the layout can be tested without a terminal.
use filament_core::analysis::ScanSummary;
use filament_core::scanner::progress::ScanComplete;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Skipped paths listed in full before the rest are collapsed into a count.
const MAX_SKIPPED_SHOWN: usize = 20;

/// Format a count with thousand separators.
pub fn format_count(count: usize) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Per-source and per-subdirectory breakdown followed by the file list.
pub fn render_summary(summary: &ScanSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Profiles: {}", format_count(summary.total_files));

    if summary.total_files == 0 {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "By slicer:");
    for (slicer, count) in &summary.by_source {
        let _ = writeln!(out, "  {slicer:<24} {:>6}", format_count(*count));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "By folder:");
    for (folder, count) in &summary.by_subdirectory {
        let _ = writeln!(out, "  {folder:<24} {:>6}", format_count(*count));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Files:");
    for file in &summary.files {
        let marker = if file.has_display_name { ' ' } else { '*' };
        let _ = writeln!(out, " {marker}{:<32} {}", file.display_name, file.key);
    }

    if summary.files.iter().any(|f| !f.has_display_name) {
        let _ = writeln!(out);
        let _ = writeln!(out, "* no \"name\" or \"filament_id\" field");
    }

    out
}

/// Footer listing slicers found and any skipped paths.
pub fn render_completion(
    complete: &ScanComplete,
    skipped: &[(PathBuf, String)],
    skipped_count: usize,
) -> String {
    let mut out = String::new();

    if !complete.found_slicers.is_empty() {
        let _ = writeln!(out, "Slicers: {}", complete.found_slicers.join(", "));
    }
    let _ = writeln!(
        out,
        "Loaded {} of {} candidate files in {:.2?}",
        format_count(complete.total_files),
        format_count(complete.files_found),
        complete.duration
    );

    if skipped_count > 0 {
        let _ = writeln!(out, "Skipped {}:", format_count(skipped_count));
        for (path, message) in skipped.iter().take(MAX_SKIPPED_SHOWN) {
            let _ = writeln!(out, "  {}: {message}", path.display());
        }
        let hidden = skipped_count.saturating_sub(skipped.len().min(MAX_SKIPPED_SHOWN));
        if hidden > 0 {
            let _ = writeln!(out, "  ... and {} more", format_count(hidden));
        }
    }

    out
}
