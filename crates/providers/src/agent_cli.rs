//! Assistant CLI transport: one prompt as the single argument, stdout back.

use shared::{ModelClient, ModelError, ModelSettings};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub struct AgentCliClient {
    command: String,
    timeout_secs: u64,
}

impl AgentCliClient {
    pub fn new(settings: &ModelSettings) -> Self {
        Self {
            command: settings.agent_cmd.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }
}

#[async_trait::async_trait]
impl ModelClient for AgentCliClient {
    fn name(&self) -> &str {
        &self.command
    }

    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        // kill_on_drop so an abandoned call cannot leave the child running
        // past the timeout.
        let result = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.command)
                .arg(prompt)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ModelError::Unavailable(format!(
                    "{} exited with {}: {}",
                    self.command,
                    output.status,
                    stderr.trim()
                )))
            }
            Ok(Err(err)) => Err(ModelError::Unavailable(format!(
                "failed to run {}: {}",
                self.command, err
            ))),
            Err(_) => Err(ModelError::Timeout(self.timeout_secs)),
        }
    }
}
