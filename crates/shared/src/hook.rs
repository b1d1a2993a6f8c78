//! Payloads exchanged with the coding assistant.
//!
//! The assistant delivers one JSON envelope on stdin when a tool finishes;
//! we answer with a single `OrganizationResult` on stdout. Anything else
//! (diagnostics, the decision trail) goes to stderr.

use serde::{Deserialize, Serialize};

/// Envelope for a single tool invocation, as delivered on stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct HookEvent {
    pub session_id: String,
    pub transcript_path: String,
    pub hook_event_name: String,
    pub tool_name: String,
    /// Shape depends on `tool_name`; decoded by [`ToolOperation::from_event`].
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

/// One edit inside a MultiEdit batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOperation {
    pub old_string: String,
    pub new_string: String,
    #[serde(default)]
    pub replace_all: bool,
}

#[derive(Deserialize)]
struct WriteInput {
    file_path: String,
    content: String,
}

#[derive(Deserialize)]
struct EditInput {
    file_path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: bool,
}

#[derive(Deserialize)]
struct MultiEditInput {
    file_path: String,
    edits: Vec<EditOperation>,
}

/// File-writing tool calls we understand, keyed by `tool_name`.
#[derive(Debug, Clone)]
pub enum ToolOperation {
    Write {
        file_path: String,
        content: String,
    },
    Edit {
        file_path: String,
        old_string: String,
        new_string: String,
        replace_all: bool,
    },
    MultiEdit {
        file_path: String,
        edits: Vec<EditOperation>,
    },
}

impl ToolOperation {
    /// Decodes the envelope's `tool_input` according to its `tool_name`.
    /// Returns `None` for tools we do not handle or payloads that do not
    /// match the expected shape.
    pub fn from_event(event: &HookEvent) -> Option<Self> {
        let input = event.tool_input.clone();
        match event.tool_name.as_str() {
            "Write" => serde_json::from_value::<WriteInput>(input)
                .ok()
                .map(|w| ToolOperation::Write {
                    file_path: w.file_path,
                    content: w.content,
                }),
            "Edit" => serde_json::from_value::<EditInput>(input)
                .ok()
                .map(|e| ToolOperation::Edit {
                    file_path: e.file_path,
                    old_string: e.old_string,
                    new_string: e.new_string,
                    replace_all: e.replace_all,
                }),
            "MultiEdit" => serde_json::from_value::<MultiEditInput>(input)
                .ok()
                .map(|m| ToolOperation::MultiEdit {
                    file_path: m.file_path,
                    edits: m.edits,
                }),
            _ => None,
        }
    }

    /// Path of the file the tool wrote or edited.
    pub fn file_path(&self) -> &str {
        match self {
            ToolOperation::Write { file_path, .. }
            | ToolOperation::Edit { file_path, .. }
            | ToolOperation::MultiEdit { file_path, .. } => file_path,
        }
    }
}

/// Verdict returned to the assistant on stdout.
///
/// `decision` is reserved for blocking verdicts; every outcome today is
/// advisory, carried in `reason`. A `None` decision is omitted from the
/// serialized object entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    pub reason: String,
}

impl OrganizationResult {
    /// The file was left where it is, with the reason why.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            decision: None,
            reason: reason.into(),
        }
    }

    /// The file was moved into the given category directory.
    pub fn organized(target_dir: &str) -> Self {
        Self {
            decision: None,
            reason: format!("Organized to {}", target_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> HookEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_write_envelope() {
        let ev = event(
            r##"{
                "session_id": "abc",
                "transcript_path": "/tmp/transcript.jsonl",
                "hook_event_name": "PostToolUse",
                "tool_name": "Write",
                "tool_input": {"file_path": "/proj/notes.md", "content": "# Notes"}
            }"##,
        );
        match ToolOperation::from_event(&ev) {
            Some(ToolOperation::Write { file_path, content }) => {
                assert_eq!(file_path, "/proj/notes.md");
                assert_eq!(content, "# Notes");
            }
            other => panic!("expected Write, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_edit_defaults_replace_all() {
        let ev = event(
            r#"{
                "session_id": "abc",
                "transcript_path": "/tmp/t.jsonl",
                "hook_event_name": "PostToolUse",
                "tool_name": "Edit",
                "tool_input": {"file_path": "/proj/a.md", "old_string": "x", "new_string": "y"}
            }"#,
        );
        match ToolOperation::from_event(&ev) {
            Some(ToolOperation::Edit { replace_all, .. }) => assert!(!replace_all),
            other => panic!("expected Edit, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multi_edit() {
        let ev = event(
            r#"{
                "session_id": "abc",
                "transcript_path": "/tmp/t.jsonl",
                "hook_event_name": "PostToolUse",
                "tool_name": "MultiEdit",
                "tool_input": {"file_path": "/proj/a.md", "edits": [
                    {"old_string": "x", "new_string": "y"},
                    {"old_string": "p", "new_string": "q", "replace_all": true}
                ]}
            }"#,
        );
        match ToolOperation::from_event(&ev) {
            Some(ToolOperation::MultiEdit { edits, .. }) => {
                assert_eq!(edits.len(), 2);
                assert!(edits[1].replace_all);
            }
            other => panic!("expected MultiEdit, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_tool_yields_none() {
        let ev = event(
            r#"{
                "session_id": "abc",
                "transcript_path": "/tmp/t.jsonl",
                "hook_event_name": "PostToolUse",
                "tool_name": "Bash",
                "tool_input": {"command": "ls"}
            }"#,
        );
        assert!(ToolOperation::from_event(&ev).is_none());
    }

    #[test]
    fn test_mismatched_input_shape_yields_none() {
        // Write without content is not a Write we understand.
        let ev = event(
            r#"{
                "session_id": "abc",
                "transcript_path": "/tmp/t.jsonl",
                "hook_event_name": "PostToolUse",
                "tool_name": "Write",
                "tool_input": {"file_path": "/proj/notes.md"}
            }"#,
        );
        assert!(ToolOperation::from_event(&ev).is_none());
    }

    #[test]
    fn test_decision_omitted_when_none() {
        let result = OrganizationResult::skipped("File already organized");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"reason":"File already organized"}"#);
    }

    #[test]
    fn test_organized_reason_names_target_dir() {
        let result = OrganizationResult::organized("docs/testing");
        assert_eq!(result.reason, "Organized to docs/testing");
        assert!(result.decision.is_none());
    }
}
