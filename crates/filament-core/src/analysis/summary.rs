/// Scan summary — grouped counts and a flat file listing.
///
/// Always recomputed from the current index contents; nothing here is
/// cached. Iteration follows the index's key order, so two calls on the
/// same index state return identical summaries.
use crate::model::FilamentIndex;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub key: String,
    pub slicer_name: String,
    pub subdirectory_name: String,
    pub filename: String,
    /// `true` if `name` or `filament_id` supplied the display name.
    pub has_display_name: bool,
    pub display_name: String,
}

/// Aggregate view of the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_files: usize,
    /// Profile count per slicer.
    pub by_source: BTreeMap<String, usize>,
    /// Profile count per `slicer/subdirectory`.
    pub by_subdirectory: BTreeMap<String, usize>,
    pub files: Vec<FileRecord>,
}

/// Compute a summary of everything currently in `index`.
pub fn summarize(index: &FilamentIndex) -> ScanSummary {
    let mut summary = ScanSummary {
        total_files: index.count(),
        files: Vec::with_capacity(index.count()),
        ..ScanSummary::default()
    };

    for entry in index.iter() {
        let meta = &entry.metadata;

        *summary
            .by_source
            .entry(meta.slicer_name.to_string())
            .or_insert(0) += 1;
        *summary
            .by_subdirectory
            .entry(format!("{}/{}", meta.slicer_name, meta.subdirectory_name))
            .or_insert(0) += 1;

        let display_name = entry.display_name();
        summary.files.push(FileRecord {
            key: entry.key.clone(),
            slicer_name: meta.slicer_name.to_string(),
            subdirectory_name: meta.subdirectory_name.to_string(),
            filename: meta.filename.to_string(),
            has_display_name: display_name.is_some(),
            display_name: display_name.unwrap_or_else(|| crate::model::profile::UNNAMED.to_string()),
        });
    }

    summary
}
