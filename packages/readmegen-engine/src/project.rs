use std::path::{Path, PathBuf};

/// Per-project metadata file; the only field consumed is `[project].name`.
pub const MANIFEST_FILE: &str = "pyproject.toml";
/// Generated output artifact, one per project root.
pub const README_FILE: &str = "README.md";
/// Dependency lock file, never part of a generation payload.
pub const LOCK_FILE: &str = "poetry.lock";

/// A discovered sub-project. Created once per manifest at the start of a run,
/// filled in by change detection, and discarded when the run ends.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub root_path: PathBuf,
    pub manifest_path: PathBuf,
    /// Revision the last generated README corresponds to, when one exists.
    pub base_commit: Option<String>,
    pub changed_files: Vec<String>,
}

impl Project {
    pub fn new(name: String, manifest_path: PathBuf) -> Self {
        let root_path = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            name,
            root_path,
            manifest_path,
            base_commit: None,
            changed_files: Vec::new(),
        }
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root_path.join(README_FILE)
    }

    pub fn has_changes(&self) -> bool {
        !self.changed_files.is_empty()
    }
}
