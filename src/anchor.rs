//! Anchor id and command path helpers.
//!
//! Every rendered command and group section carries an id derived from its
//! full command path, and cross-reference targets are converted with the same
//! rules so lookups stay consistent: lowercase, runs of non-alphanumerics
//! collapsed to single dashes.

use crate::error::{DocgenError, Result};

/// Slugify arbitrary text into an anchor id. Falls back to `"id"` when the
/// input contains no usable characters.
pub fn make_id(text: &str) -> String {
    let mut id = String::new();
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if id.is_empty() {
        "id".to_string()
    } else {
        id
    }
}

/// Spaced full command path, e.g. `["tool", "sub"]` becomes `tool sub`.
pub fn command_path_text(path: &[String]) -> String {
    path.join(" ")
}

/// Convert a cross-reference target (a spaced command path such as
/// `tool sub`) into the anchor id it was registered under.
pub fn target_to_anchor_id(target: &str) -> Result<String> {
    if target.is_empty() {
        return Err(DocgenError::EmptyTarget);
    }
    Ok(make_id(target))
}
