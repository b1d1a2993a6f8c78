pub mod classifier;
pub mod dir_config;
pub mod extract;
pub mod hooks;
pub mod js_gate;
pub mod org_log;
pub mod organizer;
pub mod patterns;
pub mod prompts;

pub use hooks::process_hook_input;
pub use organizer::Organizer;
pub use patterns::{GlobPattern, PatternSet};
