use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::project::{LOCK_FILE, Project, README_FILE};

/// Resolves `path` against `repo_root` when relative, following symlinks when
/// the target exists and falling back to lexical normalization when it does
/// not (deleted files still need a comparable path).
fn resolve(repo_root: &Path, path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    };
    match std::fs::canonicalize(&absolute) {
        Ok(resolved) => resolved,
        Err(_) => normalize_lexically(&absolute),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Keeps only paths that resolve to somewhere under the project root, and
/// drops the generated README and the dependency lock file wherever they
/// live. Paths outside the root (diffs can cross project boundaries) are
/// dropped silently.
pub fn filter_project_files(project: &Project, repo_root: &Path, paths: &[String]) -> Vec<String> {
    let root = resolve(repo_root, &project.root_path);

    paths
        .iter()
        .filter(|raw| {
            let path = Path::new(raw.as_str());
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if name == README_FILE || name == LOCK_FILE => return false,
                _ => {}
            }
            resolve(repo_root, path).starts_with(&root)
        })
        .cloned()
        .collect()
}

/// Concatenates each file as `"{path}\n{content}\n\n"`, in input order.
/// Files deleted from the working tree are skipped silently; unreadable
/// files are logged and skipped.
pub fn concatenate_file_contents(repo_root: &Path, paths: &[String]) -> String {
    let mut payload = String::new();

    for raw in paths {
        let path = resolve(repo_root, Path::new(raw.as_str()));
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                payload.push_str(raw);
                payload.push('\n');
                payload.push_str(&content);
                payload.push_str("\n\n");
            }
            Err(err) => {
                warn!("failed to read {}: {err}; skipping", path.display());
            }
        }
    }

    payload
}
