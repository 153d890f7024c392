//! System-prompt resolution.
//!
//! A prompt value may be a literal or a path to a `.md`/`.txt` file; paths
//! to existing files are read and trimmed, anything else passes through
//! unchanged.

use std::fs;
use std::path::Path;

/// Resolve a prompt value: if it names an existing `.md` or `.txt` file
/// (after `~` expansion), return the trimmed file contents; otherwise
/// return the value as-is.
pub fn load_prompt(value: &str) -> String {
    let expanded = shellexpand::tilde(value);
    let path = Path::new(expanded.as_ref());

    let is_prompt_file = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("txt"));

    if is_prompt_file && path.is_file() {
        if let Ok(contents) = fs::read_to_string(path) {
            return contents.trim().to_string();
        }
    }

    value.to_string()
}
