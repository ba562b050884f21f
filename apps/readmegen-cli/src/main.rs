use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use readmegen_engine::{
    command::CommandRunner,
    config::Settings,
    generator::OpenAiGenerator,
    git::GitClient,
    orchestrator::{Orchestrator, RunSummary},
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(version, about = "Regenerates per-project README files from changed sources", long_about = None)]
struct Args {
    /// Directory to search for projects (overrides PATH_TO_PROJECT)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Model to use for generation
    #[arg(long)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("info,readmegen_cli=debug,readmegen_engine=debug")
    } else {
        EnvFilter::new("warn,readmegen_cli=info,readmegen_engine=info")
    };

    fmt::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", style("Run complete").bold().green());
    println!("  updated: {}", summary.updated.len());
    println!("  skipped: {}", summary.skipped.len());
    if !summary.failed.is_empty() {
        println!("  {}:", style("failed").bold().red());
        for (name, err) in &summary.failed {
            println!("    {}: {err}", style(name).cyan());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let mut settings = Settings::from_env().context("invalid configuration")?;
    if let Some(dir) = args.dir {
        settings.projects_dir = Some(dir);
    }
    if let Some(model) = args.model {
        settings.model = model;
    }

    let repo_root = std::env::current_dir().context("failed to resolve working directory")?;
    let runner = CommandRunner::new(settings.command_timeout);
    let git = GitClient::new(runner, repo_root);
    let generator = OpenAiGenerator::new(&settings)?;

    let orchestrator = Orchestrator::new(settings, git, generator);
    let summary = orchestrator.run().await?;

    print_summary(&summary);
    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
