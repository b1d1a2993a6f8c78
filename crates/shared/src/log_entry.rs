//! Record of a completed file move, one per organized file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One element of the JSON-array log file.
///
/// Field names stay camelCase on disk so existing logs written by earlier
/// tooling keep parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationLogEntry {
    pub timestamp: DateTime<Utc>,
    pub original_path: String,
    pub new_path: String,
    pub category: String,
    pub score: u32,
    pub reasoning: String,
}

impl OrganizationLogEntry {
    pub fn new(
        original_path: &str,
        new_path: &str,
        category: &str,
        score: u32,
        reasoning: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            original_path: original_path.to_string(),
            new_path: new_path.to_string(),
            category: category.to_string(),
            score,
            reasoning: reasoning.to_string(),
        }
    }
}
