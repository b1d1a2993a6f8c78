//! Pulls a JSON object out of a model reply. Models rarely return bare
//! JSON even when told to: replies arrive wrapped in prose, inside code
//! fences, or with trailing commentary.

use serde::de::DeserializeOwned;

/// Deserializes the first JSON object found in the reply. Tries the whole
/// reply, then any fenced code block, then the first balanced `{...}`
/// span. Returns None when nothing parses.
pub fn json_object<T: DeserializeOwned>(reply: &str) -> Option<T> {
    let trimmed = reply.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(block) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str(block.trim()) {
            return Some(value);
        }
    }

    if let Some(span) = first_balanced_object(trimmed) {
        if let Ok(value) = serde_json::from_str(span) {
            return Some(value);
        }
    }

    None
}

/// Contents of the first ``` fence, language tag skipped.
fn fenced_block(reply: &str) -> Option<&str> {
    let start = reply.find("```")?;
    let after_fence = &reply[start + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// First `{...}` span with braces balanced outside of string literals.
/// Nested objects and escaped quotes are handled; a naive regex is not
/// enough once replies contain `"key_indicators": {...}`.
fn first_balanced_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in reply.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        category: String,
        confidence: f64,
    }

    #[test]
    fn test_bare_json_parses() {
        let v: Verdict = json_object(r#"{"category": "testing", "confidence": 0.9}"#).unwrap();
        assert_eq!(v.category, "testing");
    }

    #[test]
    fn test_prose_wrapped_json() {
        let reply = r#"Sure, here is my assessment: {"category": "planning", "confidence": 0.7} Let me know if you need more."#;
        let v: Verdict = json_object(reply).unwrap();
        assert_eq!(v.category, "planning");
    }

    #[test]
    fn test_fenced_block() {
        let reply = "Here you go:\n```json\n{\"category\": \"analysis\", \"confidence\": 0.8}\n```\nDone.";
        let v: Verdict = json_object(reply).unwrap();
        assert_eq!(v.category, "analysis");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let reply = "```\n{\"category\": \"operations\", \"confidence\": 0.6}\n```";
        let v: Verdict = json_object(reply).unwrap();
        assert_eq!(v.category, "operations");
    }

    #[test]
    fn test_nested_object_survives_extraction() {
        #[derive(Debug, Deserialize)]
        struct Nested {
            decision: String,
            key_indicators: serde_json::Value,
        }
        let reply = r#"Analysis follows. {"decision": "skip", "confidence": 40, "key_indicators": {"danger_signals": ["exports"]}} End of analysis."#;
        let v: Nested = json_object(reply).unwrap();
        assert_eq!(v.decision, "skip");
        assert!(v.key_indicators["danger_signals"].is_array());
    }

    #[test]
    fn test_braces_inside_strings_do_not_truncate() {
        let reply = r#"{"category": "development", "confidence": 0.9, "note": "use {curly} syntax"}"#;
        let value: serde_json::Value = json_object(reply).unwrap();
        assert_eq!(value["note"], "use {curly} syntax");
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let reply = r#"prefix {"category": "general", "confidence": 0.5, "note": "say \"hi\""} suffix"#;
        let value: serde_json::Value = json_object(reply).unwrap();
        assert_eq!(value["category"], "general");
    }

    #[test]
    fn test_no_json_yields_none() {
        assert!(json_object::<Verdict>("I could not decide.").is_none());
        assert!(json_object::<Verdict>("").is_none());
    }

    #[test]
    fn test_wrong_shape_yields_none() {
        assert!(json_object::<Verdict>(r#"{"unrelated": true}"#).is_none());
    }
}
