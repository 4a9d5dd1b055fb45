/// Data model for loaded filament profiles.
///
/// Re-exports the profile entry type and the shared index it lives in.
pub mod index;
pub mod profile;

pub use index::{FilamentIndex, SharedIndex};
pub use profile::{profile_key, ProfileContent, ProfileEntry, ProfileMetadata};
