/// A single loaded filament profile.
///
/// The document body is kept as opaque JSON: only the display-name fields of
/// an object body are ever interpreted, everything else passes through
/// untouched (in source order) for consumers that want it. Any document that
/// parses is a profile; a non-object body simply has no display name.
use compact_str::CompactString;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Parsed profile body.
pub type ProfileContent = Value;

/// Fields checked, in priority order, when picking a display name.
pub const DISPLAY_NAME_FIELDS: &[&str] = &["name", "filament_id"];

/// Label used when a profile carries no usable display name.
pub const UNNAMED: &str = "Unnamed";

/// Build the composite index key `slicer/subdirectory/filename`.
pub fn profile_key(slicer: &str, subdirectory: &str, filename: &str) -> String {
    format!("{slicer}/{subdirectory}/{filename}")
}

/// Where a profile was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetadata {
    pub slicer_name: CompactString,
    /// The per-user (or per-account) folder under the slicer root.
    pub subdirectory_name: CompactString,
    pub filename: CompactString,
    pub absolute_path: PathBuf,
}

/// An indexed profile. Never mutated after insertion; a re-scan replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub key: String,
    pub content: ProfileContent,
    pub metadata: ProfileMetadata,
}

impl ProfileEntry {
    /// Create an entry, deriving its key from the metadata.
    pub fn new(content: ProfileContent, metadata: ProfileMetadata) -> Self {
        Self {
            key: profile_key(
                &metadata.slicer_name,
                &metadata.subdirectory_name,
                &metadata.filename,
            ),
            content,
            metadata,
        }
    }

    /// The first usable value of `name` or `filament_id`, if any.
    ///
    /// Non-empty strings are used as-is and non-zero numbers are rendered
    /// as text; empty strings, zero and every other value type count as
    /// absent, so the next field is tried.
    pub fn display_name(&self) -> Option<String> {
        DISPLAY_NAME_FIELDS
            .iter()
            .filter_map(|field| self.content.get(*field))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
                _ => None,
            })
    }

    /// Display name with the `"Unnamed"` fallback applied.
    pub fn display_name_or_default(&self) -> String {
        self.display_name().unwrap_or_else(|| UNNAMED.to_string())
    }
}
