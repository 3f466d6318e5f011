// crates/host/src/coder/prompts.rs

//! Prompt rendering for the Coder agent.

use anyhow::{Context, Result};
use minijinja::{context, Environment, UndefinedBehavior};
use serde_json::{Map, Value};

const TEMPLATE_NAME: &str = "coder";

/// Renders the coder prompt from a Jinja2 template fixed at construction.
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl PromptRenderer {
    /// Compile `template`. Syntax errors surface here, not at render time.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.add_template_owned(TEMPLATE_NAME, template.into())
            .context("failed to compile coder prompt template")?;
        Ok(Self { env })
    }

    /// Substitute `step_by_step_plan`, `user_context` and `search_results`.
    pub fn render(
        &self,
        step_by_step_plan: &str,
        user_context: &str,
        search_results: &Map<String, Value>,
    ) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let prompt = template
            .render(context! {
                step_by_step_plan => step_by_step_plan,
                user_context => user_context,
                search_results => search_results,
            })
            .context("failed to render coder prompt")?;
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TEMPLATE;
    use serde_json::json;

    fn results(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn substitutes_all_three_inputs() {
        let renderer = PromptRenderer::new(
            "{{ step_by_step_plan }}|{{ user_context }}|{% for k, v in search_results|items %}{{ k }}={{ v }};{% endfor %}",
        )
        .unwrap();

        let prompt = renderer
            .render(
                "1. write main",
                "a cli tool",
                &results(json!({"rust cli": "use clap"})),
            )
            .unwrap();

        assert_eq!(prompt, "1. write main|a cli tool|rust cli=use clap;");
    }

    #[test]
    fn unknown_variables_render_empty() {
        let renderer = PromptRenderer::new("[{{ missing }}]{{ step_by_step_plan }}").unwrap();
        let prompt = renderer.render("plan", "", &Map::new()).unwrap();
        assert_eq!(prompt, "[]plan");
    }

    #[test]
    fn broken_template_fails_at_construction() {
        assert!(PromptRenderer::new("{% for x in %}").is_err());
    }

    #[test]
    fn builtin_template_mentions_inputs_and_wire_format() {
        let renderer = PromptRenderer::new(DEFAULT_TEMPLATE).unwrap();
        let prompt = renderer
            .render(
                "Step 1: print hello",
                "python please",
                &results(json!({"python print": "print() writes to stdout"})),
            )
            .unwrap();

        assert!(prompt.contains("Step 1: print hello"));
        assert!(prompt.contains("python please"));
        assert!(prompt.contains("Query: python print"));
        assert!(prompt.contains("print() writes to stdout"));
        assert!(prompt.contains("File: `main.py`:"));
        assert!(prompt.contains("~~~"));
    }

    #[test]
    fn builtin_template_skips_empty_search_results() {
        let renderer = PromptRenderer::new(DEFAULT_TEMPLATE).unwrap();
        let prompt = renderer.render("plan", "ctx", &Map::new()).unwrap();
        assert!(!prompt.contains("Search results"));
    }
}
