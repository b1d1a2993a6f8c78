//! Local Ollama transport over `/api/chat`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{ModelClient, ModelError, ModelSettings};
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaReply,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    content: String,
}

pub struct OllamaClient {
    http: Client,
    base: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(settings: &ModelSettings) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base: settings.ollama_url.trim_end_matches('/').to_string(),
            model: settings.ollama_model.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }

    async fn chat(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/api/chat", self.base);
        let request = OllamaChatRequest {
            model: &self.model,
            messages: vec![OllamaMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };
        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| ModelError::Unavailable(format!("ollama request failed: {}", err)))?;
        if !response.status().is_success() {
            return Err(ModelError::Unavailable(format!(
                "ollama error: {}",
                response.status()
            )));
        }
        let body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|err| ModelError::Malformed(err.to_string()))?;
        Ok(body.message.content)
    }
}

#[async_trait::async_trait]
impl ModelClient for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        match tokio::time::timeout(Duration::from_secs(self.timeout_secs), self.chat(prompt)).await
        {
            Ok(result) => result,
            Err(_) => Err(ModelError::Timeout(self.timeout_secs)),
        }
    }
}
