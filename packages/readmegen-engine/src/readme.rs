use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!--\s*last\s+updated:\s*([0-9a-f]+)\s*-->").expect("marker regex is valid")
});

/// Extracts the commit token from an update marker, if the content carries
/// one. The tag matches case-insensitively; the token is returned verbatim.
pub fn extract_base_commit(content: &str) -> Option<String> {
    MARKER_RE
        .captures(content)
        .map(|captures| captures[1].to_string())
}

/// Reads the marker out of an existing README. A missing file means "first
/// run"; an unreadable file is logged and treated the same way.
pub fn read_base_commit(readme_path: &Path) -> Option<String> {
    if !readme_path.exists() {
        return None;
    }
    match std::fs::read_to_string(readme_path) {
        Ok(content) => extract_base_commit(&content),
        Err(err) => {
            warn!("failed to read {}: {err}", readme_path.display());
            None
        }
    }
}

/// Renders the final artifact: generated body, one blank line, then a marker
/// stamped with the current run's HEAD commit. The marker records which run
/// produced the file, not which commit last touched the project.
pub fn render(markdown: &str, head_commit: &str) -> String {
    format!("{markdown}\n\n<!-- Last updated: {head_commit} -->")
}
