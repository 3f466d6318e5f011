use serde::{Deserialize, Serialize};

/// One generated source file as parsed from a model response.
///
/// `file` is a relative, slash-separated path inside the project directory and
/// may contain subdirectories. `code` is the raw text with its newlines kept.
/// Several entries may share a path; the last one written wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    pub file: String,
    pub code: String,
}

impl CodeFile {
    pub fn new(file: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            code: code.into(),
        }
    }

    /// Relative path of the file inside the project.
    pub fn path(&self) -> &str {
        &self.file
    }

    /// File content.
    pub fn content(&self) -> &str {
        &self.code
    }
}
