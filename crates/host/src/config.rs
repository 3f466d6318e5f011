// crates/host/src/config.rs

//! Coder configuration, read once at start-up.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

/// Prompt template compiled into the binary.
pub const DEFAULT_TEMPLATE: &str = include_str!("coder/prompt.jinja2");

const DEFAULT_PROJECTS_DIR: &str = "data/projects";
const DEFAULT_STATE_DIR: &str = "data/state";
const DEFAULT_MAX_ATTEMPTS: usize = 5;
const DEFAULT_TYPING_DELAY_MS: u64 = 2000;

/// Everything the coder needs besides its collaborators.
///
/// Environment variables (all optional):
/// - CODER_PROJECTS_DIR: root of generated projects, default "data/projects"
/// - CODER_STATE_DIR: root of agent state files, default "data/state"
/// - CODER_PROMPT_TEMPLATE: path to a Jinja2 prompt template replacing the built-in one
/// - CODER_MAX_ATTEMPTS: model calls per `execute` before giving up, default 5
/// - CODER_TYPING_DELAY_MS: pause between emulated file edits, default 2000
#[derive(Debug, Clone)]
pub struct CoderConfig {
    pub projects_dir: PathBuf,
    pub state_dir: PathBuf,
    pub template: String,
    pub max_attempts: usize,
    pub typing_delay: Duration,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from(DEFAULT_PROJECTS_DIR),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            template: DEFAULT_TEMPLATE.trim().to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            typing_delay: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
        }
    }
}

impl CoderConfig {
    /// Construct from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("CODER_PROJECTS_DIR") {
            config.projects_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("CODER_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("CODER_PROMPT_TEMPLATE") {
            config = config.with_template_file(path)?;
        }
        if let Ok(raw) = std::env::var("CODER_MAX_ATTEMPTS") {
            let attempts: usize = raw
                .parse()
                .with_context(|| format!("CODER_MAX_ATTEMPTS is not a number: {raw}"))?;
            config = config.with_max_attempts(attempts);
        }
        if let Ok(raw) = std::env::var("CODER_TYPING_DELAY_MS") {
            let ms: u64 = raw
                .parse()
                .with_context(|| format!("CODER_TYPING_DELAY_MS is not a number: {raw}"))?;
            config.typing_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Replace the prompt template with the contents of `path`.
    pub fn with_template_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt template {:?}", path))?;
        self.template = text.trim().to_string();
        Ok(self)
    }

    /// At least one attempt is always made.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_projects_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.projects_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }
}
