/// Platform-specific functionality — where each slicer keeps its user data.

pub mod paths;

pub use paths::{
    resolve_slicer_roots, PathEnvironment, Platform, SlicerRoot, APPDATA_VAR, SUPPORTED_SLICERS,
    XDG_CONFIG_HOME_VAR,
};
