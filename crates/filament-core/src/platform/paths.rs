/// Slicer root resolution.
///
/// Maps an operating-system family plus a home directory and two optional
/// override variables to the `<base>/<Slicer>/user` directories the
/// supported slicers write their presets into. No filesystem access happens
/// here; every function is pure path arithmetic so it can be tested for any
/// platform from any host.
use crate::error::ScanError;
use compact_str::CompactString;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// Slicer applications searched by default, in report order.
pub const SUPPORTED_SLICERS: &[&str] = &["BambuStudio", "OrcaSlicer"];

/// Roaming application-data override (Windows).
pub const APPDATA_VAR: &str = "APPDATA";

/// Config-home override (XDG desktops).
pub const XDG_CONFIG_HOME_VAR: &str = "XDG_CONFIG_HOME";

/// Operating-system family, as far as slicer data layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    /// Anything else. Resolves to no roots.
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Parse a user-supplied platform name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "mac" => Some(Self::MacOs),
            "windows" | "win32" | "win" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Other => "unsupported",
        }
    }
}

/// The slice of the process environment consulted during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEnvironment {
    pub home: PathBuf,
    /// Value of `APPDATA`, if set and non-empty.
    pub app_data: Option<PathBuf>,
    /// Value of `XDG_CONFIG_HOME`, if set and non-empty.
    pub xdg_config_home: Option<PathBuf>,
}

impl PathEnvironment {
    /// An environment with only a home directory and no overrides.
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            home,
            app_data: None,
            xdg_config_home: None,
        }
    }

    /// Read the home directory and override variables from the running process.
    pub fn from_process() -> Result<Self, ScanError> {
        let home = dirs::home_dir().ok_or(ScanError::HomeDirUnavailable)?;
        Ok(Self::from_process_with_home(home))
    }

    /// Like [`from_process`](Self::from_process) but with an explicit home
    /// directory, so no home lookup is needed.
    pub fn from_process_with_home(home: PathBuf) -> Self {
        Self {
            home,
            app_data: non_empty(std::env::var_os(APPDATA_VAR)),
            xdg_config_home: non_empty(std::env::var_os(XDG_CONFIG_HOME_VAR)),
        }
    }
}

/// Empty variables behave as unset.
fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// A per-slicer base directory. Lives only for the duration of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlicerRoot {
    /// Slicer application name, e.g. "OrcaSlicer".
    pub name: CompactString,
    /// Absolute `<base>/<name>/user` directory.
    pub root_path: PathBuf,
}

/// Directory under which slicers keep their per-application folders.
///
/// `None` means the platform is unsupported.
pub fn base_directory(platform: Platform, env: &PathEnvironment) -> Option<PathBuf> {
    match platform {
        Platform::MacOs => Some(env.home.join("Library").join("Application Support")),
        Platform::Windows => Some(
            env.app_data
                .clone()
                .unwrap_or_else(|| env.home.join("AppData").join("Roaming")),
        ),
        Platform::Linux => Some(
            env.xdg_config_home
                .clone()
                .unwrap_or_else(|| env.home.join(".config")),
        ),
        Platform::Other => None,
    }
}

/// Resolve one root per slicer, in the order given.
///
/// Returns an empty vec on an unsupported platform; the caller reports
/// that as a status message rather than an error.
pub fn resolve_slicer_roots<S: AsRef<str>>(
    platform: Platform,
    env: &PathEnvironment,
    slicers: &[S],
) -> Vec<SlicerRoot> {
    let Some(base) = base_directory(platform, env) else {
        return Vec::new();
    };

    slicers
        .iter()
        .map(|name| SlicerRoot {
            name: CompactString::new(name.as_ref()),
            root_path: base.join(name.as_ref()).join("user"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn home() -> PathBuf {
        PathBuf::from("/home/maker")
    }

    fn roots(platform: Platform, env: &PathEnvironment) -> Vec<(String, PathBuf)> {
        resolve_slicer_roots(platform, env, SUPPORTED_SLICERS)
            .into_iter()
            .map(|r| (r.name.to_string(), r.root_path))
            .collect()
    }

    #[test]
    fn explicit_home_is_kept_as_given() {
        let env = PathEnvironment::from_process_with_home(home());
        assert_eq!(env.home, home());
    }

    #[test]
    fn macos_uses_application_support() {
        let env = PathEnvironment::with_home(home());
        let base = home().join("Library").join("Application Support");
        assert_eq!(
            roots(Platform::MacOs, &env),
            vec![
                ("BambuStudio".to_string(), base.join("BambuStudio").join("user")),
                ("OrcaSlicer".to_string(), base.join("OrcaSlicer").join("user")),
            ]
        );
    }

    #[test]
    fn windows_defaults_to_roaming_under_home() {
        let env = PathEnvironment::with_home(home());
        let base = home().join("AppData").join("Roaming");
        let resolved = roots(Platform::Windows, &env);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].1, base.join("BambuStudio").join("user"));
        assert_eq!(resolved[1].1, base.join("OrcaSlicer").join("user"));
    }

    #[test]
    fn windows_honours_appdata_override() {
        let mut env = PathEnvironment::with_home(home());
        env.app_data = Some(PathBuf::from("/roaming"));
        let resolved = roots(Platform::Windows, &env);
        assert_eq!(resolved[0].1, Path::new("/roaming/BambuStudio/user"));
    }

    #[test]
    fn linux_defaults_to_dot_config() {
        let env = PathEnvironment::with_home(home());
        let resolved = roots(Platform::Linux, &env);
        assert_eq!(
            resolved[1].1,
            home().join(".config").join("OrcaSlicer").join("user")
        );
    }

    #[test]
    fn linux_honours_xdg_config_home() {
        let mut env = PathEnvironment::with_home(home());
        env.xdg_config_home = Some(PathBuf::from("/xdg"));
        // The Windows override must not leak into Linux resolution.
        env.app_data = Some(PathBuf::from("/roaming"));
        let resolved = roots(Platform::Linux, &env);
        assert_eq!(resolved[0].1, Path::new("/xdg/BambuStudio/user"));
    }

    #[test]
    fn unsupported_platform_resolves_nothing() {
        let env = PathEnvironment::with_home(home());
        assert!(roots(Platform::Other, &env).is_empty());
    }

    #[test]
    fn custom_slicer_list_is_respected() {
        let env = PathEnvironment::with_home(home());
        let resolved = resolve_slicer_roots(Platform::Linux, &env, &["PrusaSlicer"]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "PrusaSlicer");
    }

    #[test]
    fn empty_override_counts_as_unset() {
        assert_eq!(non_empty(Some(OsString::new())), None);
        assert_eq!(
            non_empty(Some(OsString::from("/x"))),
            Some(PathBuf::from("/x"))
        );
    }

    #[test]
    fn platform_names_parse_case_insensitively() {
        assert_eq!(Platform::from_name("Darwin"), Some(Platform::MacOs));
        assert_eq!(Platform::from_name("WINDOWS"), Some(Platform::Windows));
        assert_eq!(Platform::from_name("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_name("plan9"), None);
    }
}
