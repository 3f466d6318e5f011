// crates/host/src/log.rs

//! Colored logging for agent operations.

use std::fmt::Display;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

/// Agent type for colored prefixes.
#[derive(Clone, Copy)]
pub enum Agent {
    Coder,
}

impl Agent {
    fn color(&self) -> &'static str {
        match self {
            Agent::Coder => MAGENTA,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Agent::Coder => "Coder",
        }
    }
}

/// Log a generation attempt.
pub fn attempt(agent: Agent, attempt: usize, max_attempts: usize, prompt_len: usize) {
    eprintln!(
        "{}{BOLD}[{}]{RESET} {DIM}Attempt {}/{}{RESET} {DIM}(prompt: {} bytes){RESET}",
        agent.color(),
        agent.name(),
        attempt,
        max_attempts,
        prompt_len
    );
}

/// Log model text response.
pub fn response(agent: Agent, text: &str) {
    let preview = truncate(text, 200);
    eprintln!(
        "{}{BOLD}[{}]{RESET} {WHITE}← {}{RESET}",
        agent.color(),
        agent.name(),
        preview
    );
}

/// Log a file operation.
pub fn file_op(agent: Agent, op: &str, path: impl Display, bytes: usize) {
    eprintln!(
        "{}{BOLD}[{}]{RESET} {CYAN}{} {}{RESET} {DIM}({} bytes){RESET}",
        agent.color(),
        agent.name(),
        op,
        path,
        bytes
    );
}

/// Log agent completion.
pub fn done(agent: Agent, message: impl Display) {
    eprintln!(
        "{}{BOLD}[{}]{RESET} {GREEN}✓ Done:{RESET} {}",
        agent.color(),
        agent.name(),
        message
    );
}

/// Log an error.
pub fn error(agent: Agent, message: impl Display) {
    eprintln!(
        "{}{BOLD}[{}]{RESET} {RED}✗ Error:{RESET} {}",
        agent.color(),
        agent.name(),
        message
    );
}

/// Log info message.
pub fn info(message: impl Display) {
    eprintln!("{DIM}[info]{RESET} {}", message);
}

/// Log a warning.
pub fn warn(message: impl Display) {
    eprintln!("{YELLOW}[warn]{RESET} {}", message);
}

/// Log success.
pub fn success(message: impl Display) {
    eprintln!("{GREEN}[ok]{RESET} {}", message);
}

/// Truncate and clean string for display.
fn truncate(s: &str, max: usize) -> String {
    let clean: String = s
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .collect();
    let trimmed = clean.trim();
    match trimmed.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
