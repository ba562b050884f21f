use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::project::{MANIFEST_FILE, Project};

/// Walks a directory tree collecting project manifests. Directories whose
/// name is in the exclusion set are pruned, so no returned manifest path
/// contains an excluded segment.
pub struct ProjectLocator {
    excluded_dirs: Vec<String>,
}

impl ProjectLocator {
    pub fn new(excluded_dirs: Vec<String>) -> Self {
        Self { excluded_dirs }
    }

    /// Returns one `Project` per parseable manifest under `start_dir`, in
    /// traversal order. Manifests that fail to parse or lack a project name
    /// are skipped without error.
    pub fn discover(&self, start_dir: &Path) -> Vec<Project> {
        let mut projects = Vec::new();

        let walker = WalkDir::new(start_dir)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE {
                if let Some(project) = read_manifest(entry.path()) {
                    projects.push(project);
                }
            }
        }

        projects
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        match entry.file_name().to_str() {
            Some(name) => self.excluded_dirs.iter().any(|d| d == name),
            None => false,
        }
    }
}

fn read_manifest(manifest_path: &Path) -> Option<Project> {
    let content = match std::fs::read_to_string(manifest_path) {
        Ok(content) => content,
        Err(err) => {
            debug!("failed to read {}: {err}", manifest_path.display());
            return None;
        }
    };

    let value: toml::Value = match content.parse() {
        Ok(value) => value,
        Err(err) => {
            debug!("failed to parse {}: {err}", manifest_path.display());
            return None;
        }
    };

    let name = value.get("project")?.get("name")?.as_str()?;
    Some(Project::new(name.to_string(), manifest_path.to_path_buf()))
}
