/// Export of summaries and profiles to CSV and JSON.
use crate::analysis::summary::ScanSummary;
use crate::error::ExportError;
use serde::Serialize;
use std::io::Write;

/// Write the summary's file listing as CSV, one row per profile.
///
/// Columns follow [`FileRecord`](crate::analysis::FileRecord) field names.
pub fn write_files_csv<W: Write>(summary: &ScanSummary, writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in &summary.files {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write any serialisable value (summary, profile map, completion report)
/// as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    value: &T,
    mut writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}
