use std::path::{Path, PathBuf};

use tracing::warn;

use crate::command::{CommandError, CommandRunner};

/// Version-control queries, all run from an explicit repository root.
/// Returned paths are relative to that root, as git prints them.
pub struct GitClient {
    runner: CommandRunner,
    repo_root: PathBuf,
}

impl GitClient {
    pub fn new(runner: CommandRunner, repo_root: PathBuf) -> Self {
        Self { runner, repo_root }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub async fn head_commit(&self) -> Result<String, CommandError> {
        self.runner
            .run("git", &["rev-parse", "HEAD"], &self.repo_root)
            .await
    }

    /// Files changed under `scope` since `base_commit`. Without a base, or
    /// when the diff query fails (stale base, shallow clone), every tracked
    /// file under `scope` counts as changed.
    pub async fn changed_files(
        &self,
        scope: &Path,
        base_commit: Option<&str>,
    ) -> Result<Vec<String>, CommandError> {
        let Some(base) = base_commit else {
            return self.tracked_files(scope).await;
        };
        match self.diff_files(scope, base).await {
            Ok(files) => Ok(files),
            Err(err) => {
                warn!(
                    "diff against {base} failed for {}: {err}; falling back to all tracked files",
                    scope.display()
                );
                self.tracked_files(scope).await
            }
        }
    }

    async fn diff_files(&self, scope: &Path, base: &str) -> Result<Vec<String>, CommandError> {
        let scope = scope.to_string_lossy();
        let output = self
            .runner
            .run(
                "git",
                &["diff", "--name-only", base, "HEAD", "--", scope.as_ref()],
                &self.repo_root,
            )
            .await?;
        Ok(parse_file_list(&output))
    }

    pub async fn tracked_files(&self, scope: &Path) -> Result<Vec<String>, CommandError> {
        let scope = scope.to_string_lossy();
        let output = self
            .runner
            .run("git", &["ls-files", scope.as_ref()], &self.repo_root)
            .await?;
        Ok(parse_file_list(&output))
    }
}

/// Parses newline-delimited command output into trimmed, non-empty paths.
pub fn parse_file_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
