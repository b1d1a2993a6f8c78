//! Adapter between the raw hook payload on stdin and the organizer.
//!
//! Two failure shapes, kept distinct: text that is not JSON at all is a
//! hook error, well-formed JSON that is not a file-writing tool event is
//! simply not ours to handle.

use shared::{HookEvent, OrganizationResult, ToolOperation};
use tracing::debug;

use crate::organizer::Organizer;

/// Parses one hook payload and runs the pipeline on it. Always produces a
/// result; the caller's only job is to print it.
pub async fn process_hook_input(raw: &str, organizer: &Organizer) -> OrganizationResult {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            return OrganizationResult::skipped(format!("Hook error: {}", err));
        }
    };

    let event: HookEvent = match serde_json::from_value(value) {
        Ok(event) => event,
        Err(_) => {
            return OrganizationResult::skipped("Not a supported operation");
        }
    };
    debug!(
        "{} event from session {}: tool {}",
        event.hook_event_name, event.session_id, event.tool_name
    );

    match ToolOperation::from_event(&event) {
        Some(operation) => organizer.organize(&operation).await,
        None => OrganizationResult::skipped("Not a supported operation"),
    }
}
