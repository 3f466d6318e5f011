// crates/core/src/ai_client.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Abstract AI/LLM client for chat completions.
///
/// Implementations can use Azure Foundry, OpenAI, Ollama, etc. Only `chat`
/// has to be provided; `infer` is the single-prompt shortcut the agents use.
pub trait AiClient {
    /// Send a chat completion request.
    fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Send one user prompt and return the text of the first choice.
    fn infer(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(vec![json!({"role": "user", "content": prompt})]);
        let response = self.chat(request)?;
        response.into_text()
    }
}

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Value>) -> Self {
        Self {
            messages,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Build a response holding a single assistant message.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: Some(text.into()),
                },
            }],
        }
    }

    /// Text content of the first choice.
    pub fn into_text(self) -> Result<String> {
        let choice = self.choices.into_iter().next().context("no choices")?;
        choice
            .message
            .content
            .context("first choice has no text content")
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}
