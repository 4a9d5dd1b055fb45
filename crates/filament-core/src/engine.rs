/// Query API consumed by frontends.
///
/// `FilamentEngine` owns the shared index and the single-scan slot. Queries
/// take a read lock and may be called at any time, including mid-scan; a
/// second `start_scan` while one is running is rejected rather than queued.
use crate::analysis::{summarize, ScanSummary};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::model::{FilamentIndex, ProfileEntry, SharedIndex};
use crate::scanner::progress::{ScanComplete, ScanEvent};
use crate::scanner::{self, ScanGuard, ScanHandle};
use crossbeam_channel::Sender;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FilamentEngine {
    index: SharedIndex,
    scan_active: Arc<AtomicBool>,
}

impl Default for FilamentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilamentEngine {
    /// An engine with an empty index.
    pub fn new() -> Self {
        Self {
            index: FilamentIndex::shared(),
            scan_active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scan_active.load(Ordering::Acquire)
    }

    /// Start a scan on a background thread.
    pub fn start_scan(&self, config: ScanConfig) -> Result<ScanHandle, ScanError> {
        let guard = ScanGuard::acquire(&self.scan_active).ok_or(ScanError::AlreadyRunning)?;
        scanner::start_scan(config, self.index.clone(), guard)
    }

    /// Run a scan on the calling thread, sending events to `events`.
    pub fn scan_blocking(
        &self,
        config: &ScanConfig,
        events: &Sender<ScanEvent>,
    ) -> Result<ScanComplete, ScanError> {
        let guard = ScanGuard::acquire(&self.scan_active).ok_or(ScanError::AlreadyRunning)?;
        let cancel_flag = AtomicBool::new(false);
        Ok(scanner::execute(
            config,
            &self.index,
            events,
            &cancel_flag,
            guard,
        ))
    }

    /// Full snapshot of the index.
    pub fn get_all_profiles(&self) -> BTreeMap<String, ProfileEntry> {
        self.index.read().get_all()
    }

    pub fn get_profile(&self, key: &str) -> Option<ProfileEntry> {
        self.index.read().get(key).cloned()
    }

    pub fn get_profile_count(&self) -> usize {
        self.index.read().count()
    }

    /// Fresh summary of the current index contents.
    pub fn get_summary(&self) -> ScanSummary {
        summarize(&self.index.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{PathEnvironment, Platform};
    use std::fs;
    use tempfile::TempDir;

    fn config(home: &std::path::Path) -> ScanConfig {
        let mut config = ScanConfig::new(Platform::Linux, PathEnvironment::with_home(home.into()));
        config.read_timeout = None;
        config
    }

    #[test]
    fn new_engine_is_empty_and_idle() {
        let engine = FilamentEngine::new();
        assert!(!engine.is_scanning());
        assert_eq!(engine.get_profile_count(), 0);
        assert!(engine.get_all_profiles().is_empty());
        assert_eq!(engine.get_summary().total_files, 0);
    }

    #[test]
    fn blocking_scan_populates_queries() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join(".config/OrcaSlicer/user/default/filament/base");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("pla.json"), r#"{"name": "PLA Red"}"#).unwrap();

        let engine = FilamentEngine::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let complete = engine.scan_blocking(&config(tmp.path()), &tx).unwrap();

        assert_eq!(complete.total_files, 1);
        assert_eq!(engine.get_profile_count(), 1);
        let profile = engine
            .get_profile("OrcaSlicer/default/pla.json")
            .expect("profile indexed");
        assert_eq!(profile.display_name().as_deref(), Some("PLA Red"));
        assert!(!engine.is_scanning(), "guard released after scan");

        let completes = rx
            .try_iter()
            .filter(|e| matches!(e, ScanEvent::Complete(_)))
            .count();
        assert_eq!(completes, 1);
    }

    /// A held slot makes both entry points refuse.
    #[test]
    fn second_scan_is_rejected_while_active() {
        let tmp = TempDir::new().unwrap();
        let engine = FilamentEngine::new();
        let _held = ScanGuard::acquire(&engine.scan_active).expect("slot free");

        let (tx, _rx) = crossbeam_channel::unbounded();
        assert!(matches!(
            engine.scan_blocking(&config(tmp.path()), &tx),
            Err(ScanError::AlreadyRunning)
        ));
        assert!(matches!(
            engine.start_scan(config(tmp.path())),
            Err(ScanError::AlreadyRunning)
        ));
    }
}
