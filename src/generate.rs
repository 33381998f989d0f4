// src/generate.rs
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ollama_rs::{generation::completion::request::GenerationRequest, Ollama};
use reqwest::Url;
use tokio::time;
use tracing::{debug, warn};

use crate::{
    error::{ConfigurationError, GenerationError},
    settings::OllamaSettings,
};

/// A text-generation backend: prompt in, text out.
#[async_trait]
pub(crate) trait Generate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Single-shot, non-streaming completions from an Ollama server.
pub(crate) struct OllamaGenerator {
    client: Ollama,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaGenerator {
    pub(crate) fn new(settings: &OllamaSettings) -> Result<Self, ConfigurationError> {
        let url = Url::parse(&settings.url).map_err(|e| ConfigurationError::InvalidBackendUrl {
            url: settings.url.clone(),
            reason: e.to_string(),
        })?;
        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
        Ok(Self {
            client: Ollama::from_url(url),
            model: settings.model.clone(),
            timeout,
        })
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generate for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerationRequest::new(self.model.clone(), prompt.to_string());
        let started = Instant::now();
        let call = self.client.generate(request);

        let result = match self.timeout {
            Some(limit) => match time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Ollama call exceeded {}s", limit.as_secs());
                    return Err(GenerationError::TimedOut(limit.as_secs()));
                }
            },
            None => call.await,
        };

        let response = result.map_err(|e| GenerationError::Backend(e.to_string()))?;
        debug!(
            "Ollama answered {} bytes for a {} byte prompt in {:?}",
            response.response.len(),
            prompt.len(),
            started.elapsed()
        );
        Ok(response.response)
    }
}

/// Canned backend used by unit tests; records every prompt it receives.
#[cfg(test)]
pub(crate) struct StubGenerator {
    reply: Result<String, String>,
    pub(crate) prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl StubGenerator {
    pub(crate) fn answering(answer: &str) -> Self {
        Self {
            reply: Ok(answer.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Generate for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(GenerationError::Backend)
    }
}
