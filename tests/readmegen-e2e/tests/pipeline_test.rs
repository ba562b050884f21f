use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use readmegen_engine::command::CommandRunner;
use readmegen_engine::config::Settings;
use readmegen_engine::generator::{GenerateError, ReadmeGenerator, extract_markdown};
use readmegen_engine::git::GitClient;
use readmegen_engine::orchestrator::Orchestrator;
use tempfile::tempdir;

/// Generator double that records every payload it receives and answers with
/// a canned service reply, run through the same reply parsing as the real
/// client.
#[derive(Clone)]
struct RecordingGenerator {
    reply: String,
    payloads: Arc<Mutex<Vec<String>>>,
}

impl RecordingGenerator {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadmeGenerator for RecordingGenerator {
    async fn generate(&self, payload: &str) -> Result<String, GenerateError> {
        self.payloads.lock().unwrap().push(payload.to_string());
        Ok(extract_markdown(&self.reply))
    }
}

/// Generator that fails whenever the payload mentions a poisoned file.
struct PoisonedGenerator;

#[async_trait]
impl ReadmeGenerator for PoisonedGenerator {
    async fn generate(&self, payload: &str) -> Result<String, GenerateError> {
        if payload.contains("boom") {
            return Err(GenerateError::Transport("connection reset".to_string()));
        }
        Ok("# OK".to_string())
    }
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(repo)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

fn head_commit(repo: &Path) -> String {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo)
        .output()
        .expect("failed to run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(repo: &Path) {
    git(repo, &["init", "-q"]);
    git(repo, &["config", "user.email", "test@example.com"]);
    git(repo, &["config", "user.name", "test"]);
}

fn write_project(repo: &Path, rel_root: &str, name: &str) -> PathBuf {
    let root = repo.join(rel_root);
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("pyproject.toml"),
        format!("[project]\nname = \"{name}\"\n"),
    )
    .unwrap();
    root
}

fn orchestrator<G: ReadmeGenerator>(repo: &Path, generator: G) -> Orchestrator<G> {
    let settings = Settings::new("test-key", Some(PathBuf::from("projects")));
    let runner = CommandRunner::new(Duration::from_secs(30));
    let git_client = GitClient::new(runner, repo.to_path_buf());
    Orchestrator::new(settings, git_client, generator)
}

#[tokio::test]
async fn first_run_writes_and_second_run_is_idempotent() -> Result<()> {
    if !git_available() {
        eprintln!("git not available; skipping");
        return Ok(());
    }

    let tmp = tempdir()?;
    let repo = tmp.path().canonicalize()?;
    init_repo(&repo);

    let root = write_project(&repo, "projects/demo", "demo");
    fs::write(root.join("x.py"), "print(1)")?;
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-q", "-m", "initial"]);
    let head = head_commit(&repo);

    let generator = RecordingGenerator::new(r##"{"markdown": "# Demo"}"##);
    let runner = orchestrator(&repo, generator.clone());

    // First run: no marker, so every tracked file counts as changed.
    let summary = runner.run().await?;
    assert_eq!(summary.updated, vec!["demo".to_string()]);
    assert!(summary.skipped.is_empty());
    assert!(summary.failed.is_empty());

    let readme = fs::read_to_string(root.join("README.md"))?;
    assert_eq!(readme, format!("# Demo\n\n<!-- Last updated: {head} -->"));

    let payloads = generator.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].contains("projects/demo/x.py\nprint(1)\n\n"));
    // The generated artifact itself never feeds the payload.
    assert!(!payloads[0].contains("README.md"));

    // Second run: marker matches HEAD, diff is empty, project is skipped
    // and the artifact is byte-identical.
    let summary = runner.run().await?;
    assert_eq!(summary.skipped, vec!["demo".to_string()]);
    assert!(summary.updated.is_empty());
    assert_eq!(generator.payloads().len(), 1);
    assert_eq!(fs::read_to_string(root.join("README.md"))?, readme);

    Ok(())
}

#[tokio::test]
async fn incremental_run_only_sends_files_changed_since_the_marker() -> Result<()> {
    if !git_available() {
        eprintln!("git not available; skipping");
        return Ok(());
    }

    let tmp = tempdir()?;
    let repo = tmp.path().canonicalize()?;
    init_repo(&repo);

    let root = write_project(&repo, "projects/demo", "demo");
    fs::write(root.join("x.py"), "print(1)")?;
    fs::write(root.join("y.py"), "print(2)")?;
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-q", "-m", "initial"]);

    let generator = RecordingGenerator::new(r##"{"markdown": "# Demo"}"##);
    let runner = orchestrator(&repo, generator.clone());
    runner.run().await?;

    // Change only x.py and commit; the README with the old marker stays
    // uncommitted, exactly as in normal operation.
    fs::write(root.join("x.py"), "print(3)")?;
    git(&repo, &["add", "projects/demo/x.py"]);
    git(&repo, &["commit", "-q", "-m", "update x"]);
    let new_head = head_commit(&repo);

    let summary = runner.run().await?;
    assert_eq!(summary.updated, vec!["demo".to_string()]);

    let payloads = generator.payloads();
    assert_eq!(payloads.len(), 2);
    assert!(payloads[1].contains("projects/demo/x.py\nprint(3)\n\n"));
    assert!(!payloads[1].contains("y.py"));

    let readme = fs::read_to_string(root.join("README.md"))?;
    assert!(readme.ends_with(&format!("<!-- Last updated: {new_head} -->")));

    Ok(())
}

#[tokio::test]
async fn non_json_reply_is_used_verbatim() -> Result<()> {
    if !git_available() {
        eprintln!("git not available; skipping");
        return Ok(());
    }

    let tmp = tempdir()?;
    let repo = tmp.path().canonicalize()?;
    init_repo(&repo);

    let root = write_project(&repo, "projects/demo", "demo");
    fs::write(root.join("x.py"), "print(1)")?;
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-q", "-m", "initial"]);
    let head = head_commit(&repo);

    let generator = RecordingGenerator::new("plain text reply");
    let summary = orchestrator(&repo, generator).run().await?;
    assert_eq!(summary.updated, vec!["demo".to_string()]);

    let readme = fs::read_to_string(root.join("README.md"))?;
    assert_eq!(
        readme,
        format!("plain text reply\n\n<!-- Last updated: {head} -->")
    );

    Ok(())
}

#[tokio::test]
async fn one_failing_project_does_not_abort_the_run() -> Result<()> {
    if !git_available() {
        eprintln!("git not available; skipping");
        return Ok(());
    }

    let tmp = tempdir()?;
    let repo = tmp.path().canonicalize()?;
    init_repo(&repo);

    let poisoned = write_project(&repo, "projects/poisoned", "poisoned");
    fs::write(poisoned.join("main.py"), "boom")?;
    let healthy = write_project(&repo, "projects/healthy", "healthy");
    fs::write(healthy.join("main.py"), "print(1)")?;
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-q", "-m", "initial"]);

    let summary = orchestrator(&repo, PoisonedGenerator).run().await?;

    assert_eq!(summary.updated, vec!["healthy".to_string()]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "poisoned");
    assert!(!summary.is_success());

    assert!(healthy.join("README.md").exists());
    assert!(!poisoned.join("README.md").exists());

    Ok(())
}

#[tokio::test]
async fn a_tree_without_manifests_yields_an_empty_run() -> Result<()> {
    if !git_available() {
        eprintln!("git not available; skipping");
        return Ok(());
    }

    let tmp = tempdir()?;
    let repo = tmp.path().canonicalize()?;
    init_repo(&repo);

    fs::create_dir_all(repo.join("projects"))?;
    fs::write(repo.join("projects/notes.txt"), "nothing here")?;
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-q", "-m", "initial"]);

    let generator = RecordingGenerator::new(r##"{"markdown": "# Demo"}"##);
    let summary = orchestrator(&repo, generator.clone()).run().await?;

    assert!(summary.updated.is_empty());
    assert!(summary.skipped.is_empty());
    assert!(summary.failed.is_empty());
    assert!(generator.payloads().is_empty());

    Ok(())
}

#[tokio::test]
async fn a_stale_marker_falls_back_to_all_tracked_files() -> Result<()> {
    if !git_available() {
        eprintln!("git not available; skipping");
        return Ok(());
    }

    let tmp = tempdir()?;
    let repo = tmp.path().canonicalize()?;
    init_repo(&repo);

    let root = write_project(&repo, "projects/demo", "demo");
    fs::write(root.join("x.py"), "print(1)")?;
    // Marker points at a commit this repository has never seen.
    fs::write(
        root.join("README.md"),
        "# Old\n\n<!-- Last updated: deadbeefdeadbeefdeadbeefdeadbeefdeadbeef -->",
    )?;
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-q", "-m", "initial"]);

    let generator = RecordingGenerator::new(r##"{"markdown": "# Recovered"}"##);
    let summary = orchestrator(&repo, generator.clone()).run().await?;

    assert_eq!(summary.updated, vec!["demo".to_string()]);
    let payloads = generator.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].contains("projects/demo/x.py\nprint(1)\n\n"));

    Ok(())
}
