//! Syntactic sanity check for submitted Manim scripts.
//!
//! The check only looks for marker substrings. It never parses or executes
//! the script, so semantically broken scripts can pass and unusual but
//! valid formulations can fail.

use serde::Serialize;

/// Message returned for a script that carries every required marker.
pub const VALID_MESSAGE: &str = "Script is valid";

/// Message returned when at least one marker is missing.
pub const INVALID_MESSAGE: &str =
    "Script missing required components (Scene class, construct method)";

/// Substrings that must all appear in a renderable script.
const REQUIRED_MARKERS: &[&str] = &["class", "Scene", "def construct"];

/// Outcome of [`validate_script`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptCheck {
    pub valid: bool,
    pub message: &'static str,
}

/// Check that `script` declares a scene class with a `construct` method.
pub fn validate_script(script: &str) -> ScriptCheck {
    let valid = REQUIRED_MARKERS.iter().all(|marker| script.contains(marker));

    ScriptCheck {
        valid,
        message: if valid { VALID_MESSAGE } else { INVALID_MESSAGE },
    }
}
