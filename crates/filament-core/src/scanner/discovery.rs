/// Candidate discovery inside a slicer root.
///
/// Layout searched:
///
/// ```text
/// <root>/                      e.g. ~/.config/OrcaSlicer/user
///   <subdirectory>/            "default" or a numeric account id
///     filament/base/*.json     candidate profiles
/// ```
///
/// Only the immediate subdirectories of the root are considered, and only
/// files directly inside `filament/base`. Listing goes through `jwalk` in
/// serial, sorted, depth-limited mode so the candidate order is the same on
/// every run.
///
/// [`Candidates`] is lazy: the root is listed on the first `next()` and each
/// subdirectory's `filament/base` folder is listed only when the previous
/// one is exhausted. A directory that cannot be listed is yielded as an
/// `Err` item and iteration continues with the next sibling.
use crate::error::DiscoveryError;
use crate::model::ProfileMetadata;
use crate::platform::SlicerRoot;
use compact_str::CompactString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path segments from a subdirectory down to its profile folder.
pub const FILAMENT_SUBPATH: [&str; 2] = ["filament", "base"];

/// Recognised profile extension (matched case-insensitively).
pub const PROFILE_EXTENSION: &str = "json";

type Entry = jwalk::DirEntry<((), ())>;

/// A file eligible for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub slicer_name: CompactString,
    pub subdirectory_name: CompactString,
    pub filename: CompactString,
    pub path: PathBuf,
}

impl CandidateFile {
    /// Provenance metadata recorded alongside the loaded profile.
    pub fn metadata(&self) -> ProfileMetadata {
        ProfileMetadata {
            slicer_name: self.slicer_name.clone(),
            subdirectory_name: self.subdirectory_name.clone(),
            filename: self.filename.clone(),
            absolute_path: self.path.clone(),
        }
    }
}

/// Whether the root exists at all. A missing root is not an error.
pub fn root_exists(root: &SlicerRoot) -> bool {
    fs::metadata(&root.root_path).is_ok()
}

/// `<subdirectory>/filament/base`.
pub fn filament_base(subdirectory: &Path) -> PathBuf {
    FILAMENT_SUBPATH
        .iter()
        .fold(subdirectory.to_path_buf(), |path, segment| path.join(segment))
}

/// `true` if `name` ends in `.json` in any letter case.
pub fn has_profile_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PROFILE_EXTENSION))
}

/// Lazily enumerate candidate files under `root`.
pub fn discover_candidates(root: &SlicerRoot) -> Candidates {
    Candidates {
        root: root.clone(),
        subdirectories: None,
        current: Vec::new().into_iter(),
    }
}

/// Lazy candidate sequence for one root. See the module docs.
#[derive(Debug)]
pub struct Candidates {
    root: SlicerRoot,
    /// `None` until the root has been listed.
    subdirectories: Option<std::vec::IntoIter<(CompactString, PathBuf)>>,
    /// Remaining candidates of the subdirectory being drained.
    current: std::vec::IntoIter<CandidateFile>,
}

impl Iterator for Candidates {
    type Item = Result<CandidateFile, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.subdirectories.is_none() {
            match list_subdirectories(&self.root.root_path) {
                Ok(dirs) => self.subdirectories = Some(dirs.into_iter()),
                Err(err) => {
                    // Nothing else to yield for this root.
                    self.subdirectories = Some(Vec::new().into_iter());
                    return Some(Err(err));
                }
            }
        }

        loop {
            if let Some(candidate) = self.current.next() {
                return Some(Ok(candidate));
            }

            let (name, path) = self.subdirectories.as_mut()?.next()?;
            let base = filament_base(&path);
            if !base.is_dir() {
                continue;
            }

            match list_candidates(&self.root.name, &name, &base) {
                Ok(files) => {
                    debug!(
                        slicer = %self.root.name,
                        subdirectory = %name,
                        count = files.len(),
                        "Listed filament/base"
                    );
                    self.current = files.into_iter();
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Immediate child directories of `root`, sorted by name.
fn list_subdirectories(root: &Path) -> Result<Vec<(CompactString, PathBuf)>, DiscoveryError> {
    Ok(list_directory(root)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| {
            let name = CompactString::new(entry.file_name().to_string_lossy());
            (name, root.join(entry.file_name()))
        })
        .collect())
}

/// Profile files directly inside a `filament/base` folder, sorted by name.
fn list_candidates(
    slicer: &CompactString,
    subdirectory: &CompactString,
    base: &Path,
) -> Result<Vec<CandidateFile>, DiscoveryError> {
    Ok(list_directory(base)?
        .into_iter()
        .filter(|entry| !entry.file_type().is_dir())
        .filter_map(|entry| {
            let filename = entry.file_name().to_string_lossy();
            if !has_profile_extension(&filename) {
                return None;
            }
            Some(CandidateFile {
                slicer_name: slicer.clone(),
                subdirectory_name: subdirectory.clone(),
                filename: CompactString::new(filename.as_ref()),
                path: base.join(entry.file_name()),
            })
        })
        .collect())
}

/// One level of `dir`, without following links below it.
///
/// `dir` itself is canonicalised first so a symlinked root (user folders
/// moved to a synced drive) is still listed. Callers build child paths from
/// the original `dir` so reported paths keep the form the user knows.
///
/// jwalk records a failed `read_dir` on the entry being read rather than
/// yielding an error item, so the walk starts at depth 0 and the root entry
/// is checked before its children are trusted. Any failure fails the whole
/// listing; callers skip the directory rather than act on a partial view
/// of it.
fn list_directory(dir: &Path) -> Result<Vec<Entry>, DiscoveryError> {
    let unreadable = |message: String| DiscoveryError::Unreadable {
        path: dir.to_path_buf(),
        message,
    };

    let resolved = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let walker = jwalk::WalkDir::new(&resolved)
        .min_depth(0)
        .max_depth(1)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    let mut entries = Vec::new();
    for entry_result in walker {
        let entry = entry_result.map_err(|err| DiscoveryError::Unreadable {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf()),
            message: err.to_string(),
        })?;

        if entry.depth == 0 {
            if !entry.file_type().is_dir() {
                return Err(unreadable("not a directory".to_string()));
            }
            if let Some(err) = entry.read_children_error.as_ref() {
                return Err(unreadable(err.to_string()));
            }
            continue;
        }
        entries.push(entry);
    }
    Ok(entries)
}
