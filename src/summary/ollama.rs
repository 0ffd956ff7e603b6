// src/summary/ollama.rs
use std::time::Duration;

use crate::summary::Summarizer;
use crate::utils::error::SummaryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "phi4-mini";

const GENERATE_TIMEOUT: Duration = Duration::from_secs(20);

/// Non-streaming client for Ollama's `/api/generate`.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(http: reqwest::Client, base_url: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint_generate(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, SummaryError> {
        let req = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let resp = self
            .http
            .post(self.endpoint_generate())
            .timeout(GENERATE_TIMEOUT)
            .json(&req)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SummaryError::Http(status));
        }

        let parsed: GenerateResponse = resp.json().await?;
        parsed
            .response
            .or(parsed.message)
            .filter(|text| !text.trim().is_empty())
            .ok_or(SummaryError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
