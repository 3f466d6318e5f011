// crates/core/src/agent_state.rs

//! Agent UI state snapshots and the append-only stores that hold them.
//!
//! Every project owns an ordered history of [`AgentState`] snapshots. The UI
//! renders the latest one; agents append new snapshots to report progress.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the agent's browser is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSession {
    pub url: Option<String>,
    pub screenshot: Option<String>,
}

/// What the agent's terminal is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSession {
    pub command: Option<String>,
    pub output: Option<String>,
    pub title: Option<String>,
}

/// A point-in-time record of agent UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub internal_monologue: String,
    pub browser_session: BrowserSession,
    pub terminal_session: TerminalSession,
    #[serde(default)]
    pub step: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub agent_is_active: bool,
    #[serde(default)]
    pub token_usage: u64,
    pub timestamp: DateTime<Utc>,
}

impl AgentState {
    /// A fresh snapshot: active agent, empty sessions, stamped now.
    pub fn new_state() -> Self {
        Self {
            internal_monologue: String::new(),
            browser_session: BrowserSession::default(),
            terminal_session: TerminalSession::default(),
            step: None,
            message: None,
            completed: false,
            agent_is_active: true,
            token_usage: 0,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only per-project store of agent state snapshots.
pub trait StateStore {
    /// The most recent snapshot for `project`, if any was ever appended.
    fn latest_state(&self, project: &str) -> Result<Option<AgentState>>;

    /// Append `state` to the history of `project`.
    fn add_to_current_state(&self, project: &str, state: AgentState) -> Result<()>;

    /// A fresh default snapshot.
    fn new_state(&self) -> AgentState {
        AgentState::new_state()
    }
}

/// In-process store. Histories live only as long as the store.
#[derive(Default)]
pub struct MemoryStateStore {
    states: RefCell<HashMap<String, Vec<AgentState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full history for `project`, oldest first.
    pub fn history(&self, project: &str) -> Vec<AgentState> {
        self.states
            .borrow()
            .get(project)
            .cloned()
            .unwrap_or_default()
    }
}

impl StateStore for MemoryStateStore {
    fn latest_state(&self, project: &str) -> Result<Option<AgentState>> {
        Ok(self
            .states
            .borrow()
            .get(project)
            .and_then(|history| history.last().cloned()))
    }

    fn add_to_current_state(&self, project: &str, state: AgentState) -> Result<()> {
        self.states
            .borrow_mut()
            .entry(project.to_string())
            .or_default()
            .push(state);
        Ok(())
    }
}

/// File-backed store: `<root>/<project>.json` holds the project's history.
///
/// Path separators in the project name become `-`, so every project maps to
/// a single file directly under `root`.
pub struct JsonStateStore {
    root: PathBuf,
}

impl JsonStateStore {
    /// Create a store rooted at a directory like "data/state".
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn project_file(&self, project: &str) -> PathBuf {
        let name = project.replace(['/', '\\'], "-");
        self.root.join(format!("{}.json", name))
    }

    /// Full history for `project`, oldest first. Missing file means no history.
    pub fn history(&self, project: &str) -> Result<Vec<AgentState>> {
        let path = self.project_file(project);
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {:?}", path));
            }
        };
        serde_json::from_str(&data).with_context(|| format!("failed to parse {:?}", path))
    }
}

impl StateStore for JsonStateStore {
    fn latest_state(&self, project: &str) -> Result<Option<AgentState>> {
        Ok(self.history(project)?.pop())
    }

    fn add_to_current_state(&self, project: &str, state: AgentState) -> Result<()> {
        let mut history = self.history(project)?;
        history.push(state);

        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create state directory {:?}", self.root))?;
        let path = self.project_file(project);
        fs::write(&path, serde_json::to_string_pretty(&history)?)
            .with_context(|| format!("failed to write {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_monologue(text: &str) -> AgentState {
        let mut state = AgentState::new_state();
        state.internal_monologue = text.to_string();
        state
    }

    #[test]
    fn new_state_is_active_and_empty() {
        let state = AgentState::new_state();
        assert!(state.agent_is_active);
        assert!(!state.completed);
        assert_eq!(state.token_usage, 0);
        assert_eq!(state.browser_session, BrowserSession::default());
        assert_eq!(state.terminal_session, TerminalSession::default());
    }

    #[test]
    fn memory_store_returns_last_appended() {
        let store = MemoryStateStore::new();
        assert!(store.latest_state("demo").unwrap().is_none());

        store
            .add_to_current_state("demo", state_with_monologue("first"))
            .unwrap();
        store
            .add_to_current_state("demo", state_with_monologue("second"))
            .unwrap();

        let latest = store.latest_state("demo").unwrap().unwrap();
        assert_eq!(latest.internal_monologue, "second");
        assert_eq!(store.history("demo").len(), 2);
        assert!(store.history("other").is_empty());
    }

    #[test]
    fn json_store_persists_history_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("state");

        let store = JsonStateStore::new(&root);
        assert!(store.latest_state("demo").unwrap().is_none());

        let mut first = state_with_monologue("first");
        first.browser_session.url = Some("https://docs.rs".to_string());
        store.add_to_current_state("demo", first).unwrap();
        store
            .add_to_current_state("demo", state_with_monologue("second"))
            .unwrap();

        let reopened = JsonStateStore::new(&root);
        let history = reopened.history("demo").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0].browser_session.url.as_deref(),
            Some("https://docs.rs")
        );
        assert_eq!(
            reopened.latest_state("demo").unwrap().unwrap().internal_monologue,
            "second"
        );
    }

    #[test]
    fn json_store_rejects_corrupt_history() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("demo.json"), "not json").unwrap();

        let store = JsonStateStore::new(dir.path());
        assert!(store.latest_state("demo").is_err());
    }

    #[test]
    fn json_store_keeps_projects_with_slashes_in_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path());

        store
            .add_to_current_state("team/app", state_with_monologue("hi"))
            .unwrap();

        assert!(dir.path().join("team-app.json").is_file());
        assert_eq!(
            store.latest_state("team/app").unwrap().unwrap().internal_monologue,
            "hi"
        );
    }
}
