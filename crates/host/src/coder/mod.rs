// crates/host/src/coder/mod.rs

//! Coder agent: turns a plan into project files.
//!
//! One `execute` call renders the prompt, asks the model for code, parses the
//! reply into files and replays them as terminal edits in the agent state.
//! Writing the files to disk is a separate step (`save_code_to_project`).

mod emulate;
mod errors;
mod project;
mod prompts;
mod response;

use std::path::PathBuf;

use anyhow::Result;
use serde_json::{Map, Value};

use coder_core::agent_state::StateStore;
use coder_core::ai_client::AiClient;
use coder_core::types::CodeFile;

use crate::config::CoderConfig;
use crate::log::{self, Agent};

use emulate::emulate_code_writing;
use errors::ExecuteError;
use project::{project_path, save_code_to_project};
use prompts::PromptRenderer;
use response::validate_response;

pub use response::response_to_markdown;

/// The coder agent, bound to a model client and a state store.
pub struct Coder<'a, C: AiClient, S: StateStore> {
    client: &'a C,
    store: &'a S,
    renderer: PromptRenderer,
    config: CoderConfig,
}

impl<'a, C: AiClient, S: StateStore> Coder<'a, C, S> {
    /// Fails if the configured prompt template does not compile.
    pub fn new(client: &'a C, store: &'a S, config: CoderConfig) -> Result<Self> {
        let renderer = PromptRenderer::new(config.template.clone())?;
        Ok(Self {
            client,
            store,
            renderer,
            config,
        })
    }

    pub fn render(
        &self,
        step_by_step_plan: &str,
        user_context: &str,
        search_results: &Map<String, Value>,
    ) -> Result<String> {
        self.renderer
            .render(step_by_step_plan, user_context, search_results)
    }

    pub fn project_path(&self, project_name: &str) -> PathBuf {
        project_path(&self.config.projects_dir, project_name)
    }

    pub fn save_code_to_project(
        &self,
        files: &[CodeFile],
        project_name: &str,
    ) -> Result<Option<PathBuf>> {
        save_code_to_project(&self.config.projects_dir, files, project_name)
    }

    pub fn emulate_code_writing(&self, files: &[CodeFile], project_name: &str) -> Result<()> {
        emulate_code_writing(self.store, files, project_name, self.config.typing_delay)
    }

    /// Ask the model for code until it returns at least one well-formed file.
    ///
    /// Malformed and empty responses are retried up to `max_attempts` model
    /// calls; client and store errors abort immediately.
    pub fn execute(
        &self,
        step_by_step_plan: &str,
        user_context: &str,
        search_results: &Map<String, Value>,
        project_name: &str,
    ) -> Result<Vec<CodeFile>> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let prompt = self.render(step_by_step_plan, user_context, search_results)?;
            log::attempt(Agent::Coder, attempt, max_attempts, prompt.len());

            let response = self.client.infer(&prompt)?;
            log::response(Agent::Coder, &response);

            match validate_response(&response) {
                Ok(files) if !files.is_empty() => {
                    log::done(Agent::Coder, format!("{} files", files.len()));
                    self.emulate_code_writing(&files, project_name)?;
                    return Ok(files);
                }
                Ok(_) => log::warn("Invalid response from the model (no files), trying again..."),
                Err(e) => log::warn(format!(
                    "Invalid response from the model ({e}), trying again..."
                )),
            }
        }

        log::error(Agent::Coder, "no usable response, giving up");
        Err(ExecuteError::RetriesExhausted {
            attempts: max_attempts,
        }
        .into())
    }
}
