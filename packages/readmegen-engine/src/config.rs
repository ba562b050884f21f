use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

/// Directory names never descended into during project discovery.
pub fn default_excluded_dirs() -> Vec<String> {
    ["node_modules", ".git", "__pycache__", ".venv", "venv", "target"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Application configuration, built once at startup and passed by reference
/// into every component. No component reads the environment on its own.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API credential for the generation service. Required.
    pub api_key: String,
    /// Directory under which to search for projects, relative to the repo
    /// root unless absolute. Optional; the repo root is used when unset.
    pub projects_dir: Option<PathBuf>,
    pub excluded_dirs: Vec<String>,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    /// Deadline for a single generation request.
    pub request_timeout: Duration,
    /// Deadline for a single external command.
    pub command_timeout: Duration,
}

impl Settings {
    pub fn new(api_key: impl Into<String>, projects_dir: Option<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            projects_dir,
            excluded_dirs: default_excluded_dirs(),
            model: "gpt-4-turbo".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            request_timeout: Duration::from_secs(300),
            command_timeout: Duration::from_secs(60),
        }
    }

    /// Loads settings from the environment (and a `.env` file when present).
    /// A missing `OPENAI_API_KEY` is fatal; `PATH_TO_PROJECT` is optional.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = match env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!("missing required environment variable: OPENAI_API_KEY"),
        };

        let projects_dir = env::var("PATH_TO_PROJECT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self::new(api_key, projects_dir))
    }
}
