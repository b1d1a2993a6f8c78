//! Prompt templates for the two model calls the pipeline makes: document
//! categorization and the aggressive-mode script safety review.

/// Categorization prompt. Lists every selectable category with its
/// description; `general` is deliberately absent from the menu and only
/// offered as the none-of-the-above answer.
pub fn categorize_file(file_name: &str, content: &str) -> String {
    format!(
        r#"Analyze this file and categorize it into one of these categories:

Available categories:
{menu}
File: {file_name}
Content:
{content}

Please respond with ONLY a JSON object in this format:
{{
  "category": "category_name",
  "confidence": 0.85,
  "reasoning": "Brief explanation of why this category was chosen"
}}

Choose the most appropriate category based on the file content. If none fit well, use "general"."#,
        menu = category_menu(),
        file_name = file_name,
        content = content,
    )
}

/// Safety review prompt for aggressive-mode script handling. The reply
/// contract is strict: a skip decision or anything unparseable keeps the
/// file where it is.
pub fn js_safety(file_path: &str, content: &str) -> String {
    format!(
        r#"CRITICAL SAFETY ANALYSIS: JavaScript/MJS File Organization Decision

You are performing a HIGH-STAKES analysis to determine if a JavaScript/MJS file should be organized.
Moving the wrong file could break production systems, so extreme caution is required.

FILE CONTENT TO ANALYZE:
{content}

FILE PATH: {file_path}

ANALYZE WITH EXTREME CARE:

1. PURPOSE DETECTION:
   - What does this file do?
   - Is it a one-off utility or core application code?
   - Does it appear to be temporary or permanent?

2. SAFETY INDICATORS (suggests safe to organize):
   - #!/usr/bin/env node shebang
   - Command-line argument parsing
   - Console output for human reading
   - Self-contained script with process.exit()
   - No exports or module.exports
   - Utility naming patterns (check-, test-, debug-, etc.)
   - Temporary or experimental code

3. DANGER INDICATORS (MUST NOT organize):
   - Exports functions/classes/constants
   - Part of application architecture
   - Database models or API routes
   - React/Vue/Angular components
   - Service layer code
   - Could be imported by other files

4. CONTEXT CLUES:
   - File location (root = more likely utility)
   - File naming conventions
   - Code style and structure
   - Presence of tests for this file

DECISION CRITERIA:
- Only return "organize" if confidence >= 95%
- When in doubt, ALWAYS choose "skip"
- Consider the catastrophic risk of breaking production

RESPOND WITH THIS EXACT JSON FORMAT:
{{
  "decision": "organize" or "skip",
  "confidence": 0-100,
  "reasoning": "Detailed explanation of your decision",
  "risk_factors": ["List", "of", "potential", "risks"],
  "file_purpose": "Brief description of what this file does",
  "key_indicators": {{
    "utility_signals": ["List", "of", "utility", "indicators", "found"],
    "danger_signals": ["List", "of", "danger", "indicators", "found"]
  }}
}}"#,
        content = content,
        file_path = file_path,
    )
}

fn category_menu() -> String {
    shared::category::candidates()
        .map(|c| format!("- {}: {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
