//! `docsort`: a PostToolUse hook that files documents and scripts written
//! by a coding assistant into category directories under the project root.
//!
//! Reads one JSON envelope from stdin, prints one JSON verdict to stdout,
//! and always exits 0 so a hook failure can never block the assistant.
//! Everything else goes to stderr.

use anyhow::{Context, Result};
use providers::ModelRouter;
use services::{process_hook_input, Organizer};
use shared::{OrganizationResult, OrganizeConfig};
use std::io;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &OrganizeConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if config.debug_enabled { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(config: OrganizeConfig) -> Result<OrganizationResult> {
    let raw = io::read_to_string(io::stdin()).context("reading hook payload from stdin")?;
    debug!("hook payload: {} bytes", raw.len());

    let model = Arc::new(ModelRouter::from_settings(&config.model));
    let organizer = Organizer::new(config, model);
    Ok(process_hook_input(&raw, &organizer).await)
}

#[tokio::main]
async fn main() {
    let config = OrganizeConfig::from_env();
    init_tracing(&config);

    let result = match run(config).await {
        Ok(result) => result,
        Err(err) => OrganizationResult::skipped(format!("Hook error: {:#}", err)),
    };
    let json = serde_json::to_string(&result)
        .unwrap_or_else(|_| r#"{"reason":"Hook error: could not serialize result"}"#.to_string());
    println!("{}", json);
}
