//! Preference-ordered fallback over the configured transports.

use crate::agent_cli::AgentCliClient;
use crate::ollama::OllamaClient;
use shared::{ModelClient, ModelError, ModelSettings};
use tracing::{debug, warn};

/// Tries each client in order; the first success wins. Itself a
/// `ModelClient`, so the pipeline never knows how many transports sit
/// behind it.
pub struct ModelRouter {
    clients: Vec<Box<dyn ModelClient>>,
}

impl ModelRouter {
    pub fn new(clients: Vec<Box<dyn ModelClient>>) -> Self {
        Self { clients }
    }

    /// Builds the client list from the configured preference order.
    /// Unknown transport names are skipped with a warning.
    pub fn from_settings(settings: &ModelSettings) -> Self {
        let mut clients: Vec<Box<dyn ModelClient>> = Vec::new();
        for transport in &settings.preference {
            match transport.as_str() {
                "cli" => clients.push(Box::new(AgentCliClient::new(settings))),
                "ollama" => clients.push(Box::new(OllamaClient::new(settings))),
                other => warn!("unknown model transport: {}", other),
            }
        }
        Self { clients }
    }
}

#[async_trait::async_trait]
impl ModelClient for ModelRouter {
    fn name(&self) -> &str {
        self.clients.first().map(|c| c.name()).unwrap_or("none")
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        let mut last_error = None;
        for client in &self.clients {
            match client.ask(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(err) => {
                    debug!("model client {} failed: {}", client.name(), err);
                    last_error = Some(err);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| ModelError::Unavailable("no model clients configured".to_string())))
    }
}
