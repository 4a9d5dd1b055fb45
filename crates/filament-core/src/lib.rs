/// FilamentScout Core — discovery, loading, indexing and summaries.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`platform`] — Per-OS resolution of slicer user-data roots (pure path arithmetic).
/// - [`scanner`] — Background scan of slicer roots with a status/event stream.
/// - [`model`] — Loaded profile entries and the shared in-memory index.
/// - [`analysis`] — On-demand summaries and CSV/JSON export.
/// - [`engine`] — Query API and the single-scan guard consumed by frontends.
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod platform;
pub mod scanner;

pub use config::ScanConfig;
pub use engine::FilamentEngine;
pub use error::{DiscoveryError, ExportError, LoadError, ScanError};
