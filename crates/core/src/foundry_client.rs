// crates/core/src/foundry_client.rs

//! Azure AI Foundry client for the Chat Completions API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::ai_client::{AiClient, ChatRequest, ChatResponse};

const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
const DEFAULT_MAX_TOKENS: u32 = 16000;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Azure AI Foundry client using the Chat Completions API.
///
/// Environment variables:
/// - FOUNDRY_ENDPOINT: e.g. "https://myresource.openai.azure.com"
/// - FOUNDRY_DEPLOYMENT: e.g. "gpt-4o"
/// - FOUNDRY_API_KEY: your API key
/// - FOUNDRY_API_VERSION (optional): default "2024-02-15-preview"
/// - FOUNDRY_MAX_TOKENS (optional): output token cap, default 16000
pub struct FoundryClient {
    client: Client,
    url: String,
    api_key: String,
    max_tokens: u32,
    max_attempts: u32,
}

impl FoundryClient {
    pub fn new(endpoint: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        Self {
            client: Client::new(),
            url: chat_url(endpoint, deployment, api_version),
            api_key: api_key.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// HTTP attempts per request; at least one is always made.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("FOUNDRY_ENDPOINT").context("FOUNDRY_ENDPOINT not set")?;
        let deployment =
            std::env::var("FOUNDRY_DEPLOYMENT").context("FOUNDRY_DEPLOYMENT not set")?;
        let api_key = std::env::var("FOUNDRY_API_KEY").context("FOUNDRY_API_KEY not set")?;
        let api_version = std::env::var("FOUNDRY_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        let max_tokens: u32 = std::env::var("FOUNDRY_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        eprintln!("[FoundryClient] Using Chat Completions API: {}", deployment);

        Ok(Self::new(&endpoint, &deployment, &api_key, &api_version).with_max_tokens(max_tokens))
    }
}

/// POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}
fn chat_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

/// At most `max` chars of `s`, cut on a char boundary.
fn preview(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Seconds to wait before the next attempt after a retryable HTTP status.
fn backoff_secs(status: u16, attempt: u32) -> u64 {
    let attempt = attempt as u64;
    if status == 429 {
        5 * attempt * attempt
    } else {
        attempt * 2
    }
}

impl AiClient for FoundryClient {
    fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let request = if request.max_tokens.is_none() {
            request.with_max_tokens(self.max_tokens)
        } else {
            request
        };

        let debug = std::env::var("FOUNDRY_DEBUG").is_ok();
        if debug {
            eprintln!("[FoundryClient] URL: {}", self.url);
            if let Ok(json) = serde_json::to_string_pretty(&request) {
                eprintln!("[FoundryClient] Request:\n{}", preview(&json, 2000));
            }
        }

        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            let resp = self
                .client
                .post(&self.url)
                .header("api-key", &self.api_key)
                .json(&request)
                .send();

            match resp {
                Ok(r) => {
                    if !r.status().is_success() {
                        let status = r.status();
                        let body = r.text().unwrap_or_default();

                        if status.as_u16() == 429 || status.is_server_error() {
                            let delay = backoff_secs(status.as_u16(), attempt);
                            eprintln!(
                                "[FoundryClient] Attempt {}/{}: HTTP {} - waiting {}s...\nBody: {}",
                                attempt,
                                self.max_attempts,
                                status,
                                delay,
                                preview(&body, 500)
                            );
                            last_error = Some(anyhow::anyhow!("HTTP {} - {}", status, body));
                            if attempt < self.max_attempts {
                                std::thread::sleep(Duration::from_secs(delay));
                            }
                            continue;
                        }

                        anyhow::bail!("Foundry request failed: HTTP {} - {}", status, body);
                    }

                    let raw_text = r.text().context("failed to read response body")?;

                    if debug {
                        eprintln!("[FoundryClient] Response: {}", preview(&raw_text, 500));
                    }

                    return serde_json::from_str(&raw_text)
                        .context("failed to parse Foundry response");
                }
                Err(e) => {
                    eprintln!(
                        "[FoundryClient] Attempt {}/{} network error: {} - retrying...",
                        attempt, self.max_attempts, e
                    );
                    last_error = Some(anyhow::anyhow!("network error: {}", e));
                    if attempt < self.max_attempts {
                        std::thread::sleep(Duration::from_secs(attempt as u64));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("request failed after retries")))
    }
}
