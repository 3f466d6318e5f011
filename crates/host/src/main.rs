mod coder;
mod config;
mod log;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};

use coder_core::agent_state::JsonStateStore;
use coder_core::foundry_client::FoundryClient;

use coder::Coder;
use config::CoderConfig;

/// Generate project files from a step-by-step plan.
#[derive(Debug, Parser)]
#[command(name = "coder", version)]
struct Cli {
    /// File holding the step-by-step plan.
    #[arg(long)]
    plan: PathBuf,

    /// File holding extra context from the user.
    #[arg(long)]
    context: Option<PathBuf>,

    /// JSON object mapping search queries to their results.
    #[arg(long)]
    search_results: Option<PathBuf>,

    /// Project name; its slug names the output directory.
    #[arg(long)]
    project: String,

    /// Root directory for generated projects (overrides CODER_PROJECTS_DIR).
    #[arg(long)]
    projects_dir: Option<PathBuf>,

    /// Model calls before giving up (overrides CODER_MAX_ATTEMPTS).
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Pause between emulated file edits (overrides CODER_TYPING_DELAY_MS).
    #[arg(long)]
    typing_delay_ms: Option<u64>,

    /// Print the parsed files instead of writing them to the project.
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoderConfig::from_env()?;
    if let Some(dir) = &cli.projects_dir {
        config = config.with_projects_dir(dir);
    }
    if let Some(attempts) = cli.max_attempts {
        config = config.with_max_attempts(attempts);
    }
    if let Some(ms) = cli.typing_delay_ms {
        config = config.with_typing_delay(Duration::from_millis(ms));
    }

    let plan = fs::read_to_string(&cli.plan)
        .with_context(|| format!("failed to read plan {:?}", cli.plan))?;
    let user_context = match &cli.context {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read context {:?}", path))?,
        None => String::new(),
    };
    let search_results = match &cli.search_results {
        Some(path) => read_search_results(path)?,
        None => Map::new(),
    };

    let client = FoundryClient::from_env()?;
    let store = JsonStateStore::new(&config.state_dir);
    let coder = Coder::new(&client, &store, config)?;

    log::info(format!(
        "Generating code for '{}' into {}",
        cli.project,
        coder.project_path(&cli.project).display()
    ));

    let files = coder.execute(&plan, &user_context, &search_results, &cli.project)?;

    if cli.no_save {
        println!("{}", coder::response_to_markdown(&files));
        return Ok(());
    }

    match coder.save_code_to_project(&files, &cli.project)? {
        Some(dir) => {
            log::success(format!("Wrote {} files", files.len()));
            println!("{}", dir.display());
        }
        None => log::warn("Nothing to write"),
    }

    Ok(())
}

fn read_search_results(path: &Path) -> Result<Map<String, Value>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read search results {:?}", path))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse search results {:?}", path))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("search results in {:?} must be a JSON object", path),
    }
}
