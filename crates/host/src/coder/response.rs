// crates/host/src/coder/response.rs

//! Parsing of the coder's wire format.
//!
//! The model answers with a single `~~~` envelope holding one block per file:
//! a ``File: `path`:`` header line followed by a triple-backtick fenced block
//! with the file's code. Fence lines are dropped; every other line after a
//! header belongs to that file.

use coder_core::types::CodeFile;

use super::errors::ResponseError;
use crate::log;

const ENVELOPE: &str = "~~~";
const FILE_PREFIX: &str = "File: ";
const FENCE: &str = "```";

/// Split a model response into the files it contains, in order of appearance.
///
/// An envelope without any `File:` header yields an empty list; the caller
/// decides whether that is acceptable.
pub fn validate_response(response: &str) -> Result<Vec<CodeFile>, ResponseError> {
    let body = envelope_body(response)?;

    let mut files = Vec::new();
    let mut current_file: Option<String> = None;
    let mut current_code: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in body.split('\n') {
        if line.starts_with(FILE_PREFIX) {
            if let Some(file) = current_file.take() {
                if !current_code.is_empty() {
                    files.push(CodeFile::new(file, current_code.join("\n")));
                }
            }
            current_file = Some(file_name(line)?);
            current_code.clear();
            in_fence = false;
        } else if line.starts_with(FENCE) {
            in_fence = !in_fence;
        } else {
            current_code.push(line);
        }
    }

    if let Some(file) = current_file {
        if in_fence {
            log::warn(format!("response ended inside an open code block for {file}"));
        }
        if !current_code.is_empty() {
            files.push(CodeFile::new(file, current_code.join("\n")));
        }
    }

    Ok(files)
}

/// Text between the first `~~~` and the last one, trimmed.
fn envelope_body(response: &str) -> Result<&str, ResponseError> {
    let (_, rest) = response
        .trim()
        .split_once(ENVELOPE)
        .ok_or(ResponseError::MissingDelimiter)?;
    let body = match rest.rfind(ENVELOPE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Ok(body.trim())
}

/// The path between the first two backticks of a `File:` line.
fn file_name(line: &str) -> Result<String, ResponseError> {
    let mut parts = line.splitn(3, '`');
    parts.next();
    match (parts.next(), parts.next()) {
        (Some(name), Some(_)) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        _ => Err(ResponseError::MalformedFileHeader {
            line: line.to_string(),
        }),
    }
}

/// Serialize files back into the wire format understood by [`validate_response`].
pub fn response_to_markdown(files: &[CodeFile]) -> String {
    let body = files
        .iter()
        .map(|f| format!("File: `{}`:\n{FENCE}\n{}\n{FENCE}", f.file, f.code))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{ENVELOPE}\n{body}\n{ENVELOPE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_files_in_order() {
        let response = r#"
Sure, here is the code.

~~~
File: `main.py`:
```py
from utils import helper

print(helper())
```

File: `src/utils.py`:
```py
def helper():
    return 42
```
~~~

Let me know if you need anything else.
"#;

        let files = validate_response(response).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file, "main.py");
        assert_eq!(
            files[0].code,
            "from utils import helper\n\nprint(helper())\n"
        );
        assert_eq!(files[1].file, "src/utils.py");
        assert_eq!(files[1].code, "def helper():\n    return 42");
    }

    #[test]
    fn markdown_round_trips() {
        let files = vec![
            CodeFile::new("a/b.py", "import os\n\n\ndef f():\n    pass"),
            CodeFile::new("c.py", "y = 1\n"),
            CodeFile::new("README.md", "# Title\n\n  indented line"),
        ];

        let parsed = validate_response(&response_to_markdown(&files)).unwrap();
        assert_eq!(parsed, files);
    }

    #[test]
    fn missing_envelope_is_an_error() {
        let response = "File: `main.py`:\n```\nprint(1)\n```";
        assert_eq!(
            validate_response(response),
            Err(ResponseError::MissingDelimiter)
        );
        assert_eq!(validate_response(""), Err(ResponseError::MissingDelimiter));
    }

    #[test]
    fn envelope_without_headers_is_empty() {
        let response = "~~~\nI could not write any code.\n```\nnothing\n```\n~~~";
        assert_eq!(validate_response(response), Ok(Vec::new()));
    }

    #[test]
    fn header_without_two_backticks_is_malformed() {
        let response = "~~~\nFile: main.py\n```\nprint(1)\n```\n~~~";
        assert_eq!(
            validate_response(response),
            Err(ResponseError::MalformedFileHeader {
                line: "File: main.py".to_string()
            })
        );

        let single = "~~~\nFile: `main.py\n```\nprint(1)\n```\n~~~";
        assert!(matches!(
            validate_response(single),
            Err(ResponseError::MalformedFileHeader { .. })
        ));
    }

    #[test]
    fn empty_file_name_is_malformed() {
        let response = "~~~\nFile: `  `:\n```\nprint(1)\n```\n~~~";
        assert!(matches!(
            validate_response(response),
            Err(ResponseError::MalformedFileHeader { .. })
        ));
    }

    #[test]
    fn file_name_is_trimmed_and_trailing_text_ignored() {
        let response = "~~~\nFile: ` src/app.rs ` (entry point):\n```rust\nfn main() {}\n```\n~~~";
        let files = validate_response(response).unwrap();
        assert_eq!(files, vec![CodeFile::new("src/app.rs", "fn main() {}")]);
    }

    #[test]
    fn header_with_no_lines_after_it_is_dropped() {
        let response = "~~~\nFile: `a.py`:\n```py\nx = 1\n```\nFile: `b.py`:\n~~~";
        let files = validate_response(response).unwrap();
        assert_eq!(files, vec![CodeFile::new("a.py", "x = 1")]);
    }

    #[test]
    fn text_before_first_header_is_discarded() {
        let response = "~~~\nHere you go:\nFile: `a.py`:\n```\nx = 1\n```\n~~~";
        let files = validate_response(response).unwrap();
        assert_eq!(files, vec![CodeFile::new("a.py", "x = 1")]);
    }

    #[test]
    fn duplicate_paths_are_kept_in_order() {
        let files = vec![CodeFile::new("a.py", "first"), CodeFile::new("a.py", "second")];
        let parsed = validate_response(&response_to_markdown(&files)).unwrap();
        assert_eq!(parsed, files);
    }

    #[test]
    fn unterminated_closing_envelope_keeps_remaining_text() {
        let response = "~~~\nFile: `a.py`:\n```\nx = 1\n```";
        let files = validate_response(response).unwrap();
        assert_eq!(files, vec![CodeFile::new("a.py", "x = 1")]);
    }

    #[test]
    fn unterminated_code_block_still_yields_file() {
        let response = "~~~\nFile: `a.py`:\n```\nx = 1\n~~~";
        let files = validate_response(response).unwrap();
        assert_eq!(files, vec![CodeFile::new("a.py", "x = 1")]);
    }
}
