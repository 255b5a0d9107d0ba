//! Local Ollama backend.

use super::prompt::SYSTEM_PROMPT;
use super::OpinionProvider;
use crate::error::{AppError, Result};
use crate::types::ProviderKind;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    format: &'static str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: Client, base_url: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl OpinionProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn produce_opinion(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("Requesting Ollama opinion from {} ({})", url, self.model);

        let request = GenerateRequest {
            model: &self.model,
            system: SYSTEM_PROMPT,
            prompt,
            format: "json",
            stream: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalOpinion(format!(
                "Ollama error {}: {}",
                status, body
            )));
        }

        let data: GenerateResponse = response.json().await?;
        Ok(data.response)
    }
}
