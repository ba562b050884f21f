use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::config::Settings;
use crate::discovery::ProjectLocator;
use crate::generator::ReadmeGenerator;
use crate::git::GitClient;
use crate::payload;
use crate::project::Project;
use crate::readme;

/// Per-run outcome report. A run as a whole succeeds even when individual
/// projects fail; callers decide what a non-empty `failed` list means.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Updated,
    Skipped,
}

/// Drives the whole pipeline: discover projects, detect changes, aggregate
/// payloads, generate content, write artifacts. Strictly sequential.
pub struct Orchestrator<G> {
    settings: Settings,
    git: GitClient,
    locator: ProjectLocator,
    generator: G,
}

impl<G: ReadmeGenerator> Orchestrator<G> {
    pub fn new(settings: Settings, git: GitClient, generator: G) -> Self {
        let locator = ProjectLocator::new(settings.excluded_dirs.clone());
        Self {
            settings,
            git,
            locator,
            generator,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        // One HEAD resolution per run so every regenerated README carries
        // the same marker.
        let head_commit = self
            .git
            .head_commit()
            .await
            .context("failed to resolve HEAD commit")?;

        let search_root = self.search_root();
        let mut projects = self.locator.discover(&search_root);
        if projects.is_empty() {
            info!("no projects found under {}", search_root.display());
            return Ok(RunSummary::default());
        }

        let mut summary = RunSummary::default();
        for project in &mut projects {
            info!(
                "processing project {:?} at {}",
                project.name,
                project.root_path.display()
            );
            // One project's failure never aborts the rest of the run.
            match self.process_project(project, &head_commit).await {
                Ok(Outcome::Updated) => summary.updated.push(project.name.clone()),
                Ok(Outcome::Skipped) => summary.skipped.push(project.name.clone()),
                Err(err) => {
                    warn!("project {:?} failed: {err:#}", project.name);
                    summary.failed.push((project.name.clone(), format!("{err:#}")));
                }
            }
        }

        Ok(summary)
    }

    fn search_root(&self) -> PathBuf {
        let repo_root = self.git.repo_root();
        match &self.settings.projects_dir {
            Some(dir) => {
                let dir = if dir.is_absolute() {
                    dir.clone()
                } else {
                    repo_root.join(dir)
                };
                if dir.is_dir() {
                    dir
                } else {
                    warn!(
                        "projects directory {} not found; searching from {}",
                        dir.display(),
                        repo_root.display()
                    );
                    repo_root.to_path_buf()
                }
            }
            None => {
                warn!(
                    "no projects directory configured; searching from {}",
                    repo_root.display()
                );
                repo_root.to_path_buf()
            }
        }
    }

    async fn process_project(&self, project: &mut Project, head_commit: &str) -> Result<Outcome> {
        project.base_commit = readme::read_base_commit(&project.readme_path());

        let changed = self
            .git
            .changed_files(&project.root_path, project.base_commit.as_deref())
            .await?;
        project.changed_files =
            payload::filter_project_files(project, self.git.repo_root(), &changed);

        if !project.has_changes() {
            info!("no changes detected for {:?}; skipping", project.name);
            return Ok(Outcome::Skipped);
        }

        let payload_text =
            payload::concatenate_file_contents(self.git.repo_root(), &project.changed_files);
        let markdown = self
            .generator
            .generate(&payload_text)
            .await
            .with_context(|| format!("failed to generate README for {:?}", project.name))?;
        if markdown.trim().is_empty() {
            bail!("generation service produced no content");
        }

        let readme_path = project.readme_path();
        tokio::fs::write(&readme_path, readme::render(&markdown, head_commit))
            .await
            .with_context(|| format!("failed to write {}", readme_path.display()))?;
        info!("README saved to {}", readme_path.display());

        Ok(Outcome::Updated)
    }
}
