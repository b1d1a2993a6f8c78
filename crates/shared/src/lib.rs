pub mod category;
pub mod config;
pub mod hook;
pub mod log_entry;
pub mod model;

pub use category::{Category, CATEGORIES, GENERAL};
pub use config::{JsGateLimits, JsMode, ModelSettings, OrganizeConfig, ScoreWeights};
pub use hook::{EditOperation, HookEvent, OrganizationResult, ToolOperation};
pub use log_entry::OrganizationLogEntry;
pub use model::{ModelClient, ModelError};
