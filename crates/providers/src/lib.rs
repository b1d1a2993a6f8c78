//! `ModelClient` transports: the assistant CLI, a local Ollama server, and
//! a preference-ordered router over both.

pub mod agent_cli;
pub mod ollama;
pub mod router;

pub use agent_cli::AgentCliClient;
pub use ollama::OllamaClient;
pub use router::ModelRouter;
