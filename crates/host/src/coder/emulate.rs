// crates/host/src/coder/emulate.rs

//! Replays generated files as terminal edits for the agent UI.

use std::thread;
use std::time::Duration;

use anyhow::Result;

use coder_core::agent_state::StateStore;
use coder_core::types::CodeFile;

use crate::log::{self, Agent};

pub const WRITING_MONOLOGUE: &str = "Writing code...";

/// Append one snapshot per file showing it being edited, pausing `delay`
/// after each so the UI can follow along.
pub fn emulate_code_writing<S: StateStore + ?Sized>(
    store: &S,
    files: &[CodeFile],
    project_name: &str,
    delay: Duration,
) -> Result<()> {
    for file in files {
        let browser_session = store
            .latest_state(project_name)?
            .map(|state| state.browser_session)
            .unwrap_or_default();

        let mut state = store.new_state();
        state.browser_session = browser_session;
        state.internal_monologue = WRITING_MONOLOGUE.to_string();
        state.terminal_session.title = Some(format!("Editing {}", file.path()));
        state.terminal_session.command = Some(format!("vim {}", file.path()));
        state.terminal_session.output = Some(file.content().to_string());

        store.add_to_current_state(project_name, state)?;
        log::file_op(Agent::Coder, "Editing", file.path(), file.content().len());

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    Ok(())
}
