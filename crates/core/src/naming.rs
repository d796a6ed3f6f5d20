//! Filename stems for rendered videos.
//!
//! A stem names every file a render produces (`<stem>.py`, `<stem>.mp4`)
//! and the uploaded object. Stems carry 32 bits of randomness, enough to
//! keep concurrent requests apart without any coordination.

use chrono::Utc;
use uuid::Uuid;

/// Extension of rendered artifacts.
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Prefix used when the caller does not supply a filename.
const DEFAULT_PREFIX: &str = "manim";

/// Length of the random hex suffix.
const SUFFIX_LEN: usize = 8;

/// Eight random lowercase hex characters taken from a v4 UUID.
pub fn random_suffix() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(SUFFIX_LEN);
    hex
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
///
/// Keeps caller-supplied prefixes from introducing path separators or
/// `..` components into file and object names.
pub fn sanitize_prefix(prefix: &str) -> String {
    prefix
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive a unique stem for a render request.
///
/// - custom prefix: `{prefix}_{hex8}`
/// - no prefix (or blank): `manim_{hex8}_{unix_seconds}`
pub fn video_stem(custom: Option<&str>) -> String {
    match custom.map(str::trim).filter(|c| !c.is_empty()) {
        Some(prefix) => format!("{}_{}", sanitize_prefix(prefix), random_suffix()),
        None => format!(
            "{DEFAULT_PREFIX}_{}_{}",
            random_suffix(),
            Utc::now().timestamp()
        ),
    }
}

/// `<stem>.py`
pub fn script_filename(stem: &str) -> String {
    format!("{stem}.py")
}

/// `<stem>.mp4`
pub fn video_filename(stem: &str) -> String {
    format!("{stem}{VIDEO_EXTENSION}")
}
