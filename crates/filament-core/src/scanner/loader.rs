/// Profile loading — read one candidate file and parse it into a
/// [`ProfileEntry`].
///
/// Pure apart from the read: failures come back as a typed [`LoadError`]
/// carrying the path, and the caller decides how to report them. Any
/// document that parses as JSON is accepted; only the read and the parse
/// can fail.
use crate::error::LoadError;
use crate::model::ProfileEntry;
use crate::scanner::discovery::CandidateFile;
use serde_json::Value;
use std::fs;

/// Read and parse `candidate` on the calling thread.
pub fn load_profile(candidate: &CandidateFile) -> Result<ProfileEntry, LoadError> {
    let text = fs::read_to_string(&candidate.path).map_err(|source| LoadError::Read {
        path: candidate.path.clone(),
        source,
    })?;
    parse_profile(candidate, &text)
}

/// Parse already-read text as a profile document.
pub fn parse_profile(candidate: &CandidateFile, text: &str) -> Result<ProfileEntry, LoadError> {
    let content: Value = serde_json::from_str(text).map_err(|source| LoadError::Parse {
        path: candidate.path.clone(),
        source,
    })?;
    Ok(ProfileEntry::new(content, candidate.metadata()))
}
