/// FilamentScout console — terminal frontend.
///
/// This crate contains all presentation code. Business logic lives in
/// `filament-core`.
pub mod app;
pub mod report;
pub mod state;

pub use app::{run, ConsoleOptions, OutputFormat};
