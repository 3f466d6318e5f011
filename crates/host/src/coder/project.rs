// crates/host/src/coder/project.rs

//! Writing generated files into a project directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use coder_core::types::CodeFile;

use crate::log::{self, Agent};

/// Directory name for a project: lowercase, spaces replaced by hyphens.
pub fn project_slug(project_name: &str) -> String {
    project_name.to_lowercase().replace(' ', "-")
}

/// `<projects_dir>/<slug>`.
pub fn project_path(projects_dir: &Path, project_name: &str) -> PathBuf {
    projects_dir.join(project_slug(project_name))
}

/// Write every file under the project directory, overwriting existing ones.
///
/// Returns the directory of the last file written, or `None` when `files` is
/// empty. Files written before a failure stay on disk.
pub fn save_code_to_project(
    projects_dir: &Path,
    files: &[CodeFile],
    project_name: &str,
) -> Result<Option<PathBuf>> {
    let root = project_path(projects_dir, project_name);
    let mut last_dir = None;

    for file in files {
        let file_path = root.join(file.path());
        let dir = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.clone());

        fs::create_dir_all(&dir).with_context(|| format!("failed to create {:?}", dir))?;
        fs::write(&file_path, file.content())
            .with_context(|| format!("failed to write {:?}", file_path))?;
        log::file_op(Agent::Coder, "Wrote", file_path.display(), file.content().len());

        last_dir = Some(dir);
    }

    Ok(last_dir)
}
