/// Scan configuration.
///
/// [`ScanConfig::detect`] reads the host platform, home directory and the
/// two override variables once; everything downstream works from the
/// resulting values so scans are reproducible in tests.
use crate::error::ScanError;
use crate::platform::{PathEnvironment, Platform, SUPPORTED_SLICERS};
use std::time::Duration;

/// Default cap on how long one load batch may take.
///
/// Slicer data can live on synced or network folders; files still unread
/// after this long are skipped so status reporting keeps moving.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a scan needs to know about its environment.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Operating-system family used to pick the base directory.
    pub platform: Platform,
    /// Home directory and override variables.
    pub environment: PathEnvironment,
    /// Slicer application directory names to look for, in report order.
    pub slicers: Vec<String>,
    /// Longest the scan waits for one batch of reads. `None` waits as long
    /// as the reads take.
    pub read_timeout: Option<Duration>,
    /// Maximum number of files parsed concurrently.
    pub load_parallelism: usize,
    /// Empty the index before walking (drops entries for deleted files).
    pub clear_before_scan: bool,
}

impl ScanConfig {
    /// Build a config for an explicit platform and environment with
    /// default settings for everything else.
    pub fn new(platform: Platform, environment: PathEnvironment) -> Self {
        Self {
            platform,
            environment,
            slicers: SUPPORTED_SLICERS.iter().map(|s| s.to_string()).collect(),
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            load_parallelism: num_cpus::get().max(1),
            clear_before_scan: true,
        }
    }

    /// Build a config from the running process.
    pub fn detect() -> Result<Self, ScanError> {
        Ok(Self::new(Platform::current(), PathEnvironment::from_process()?))
    }

    /// Replace the slicer list. An empty list keeps the defaults.
    pub fn with_slicers<I, S>(mut self, slicers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slicers: Vec<String> = slicers.into_iter().map(Into::into).collect();
        if !slicers.is_empty() {
            self.slicers = slicers;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn env() -> PathEnvironment {
        PathEnvironment::with_home(PathBuf::from("/home/maker"))
    }

    #[test]
    fn defaults_cover_both_slicers() {
        let config = ScanConfig::new(Platform::Linux, env());
        assert_eq!(config.slicers, vec!["BambuStudio", "OrcaSlicer"]);
        assert!(config.clear_before_scan);
        assert!(config.load_parallelism >= 1);
        assert_eq!(config.read_timeout, Some(DEFAULT_READ_TIMEOUT));
    }

    #[test]
    fn with_slicers_replaces_list() {
        let config = ScanConfig::new(Platform::Linux, env()).with_slicers(["PrusaSlicer"]);
        assert_eq!(config.slicers, vec!["PrusaSlicer"]);
    }

    #[test]
    fn with_empty_slicers_keeps_defaults() {
        let config =
            ScanConfig::new(Platform::Linux, env()).with_slicers(Vec::<String>::new());
        assert_eq!(config.slicers.len(), 2);
    }
}
