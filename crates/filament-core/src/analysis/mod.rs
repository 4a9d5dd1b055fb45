/// Analysis modules — summaries and exports computed from the index.

pub mod export;
pub mod summary;

pub use export::{write_files_csv, write_json};
pub use summary::{summarize, FileRecord, ScanSummary};
