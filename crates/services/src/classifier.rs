//! Keyword scoring fallback used whenever no model answer is available.
//! Deterministic: same file content and name always land in the same
//! category.

use shared::{Category, ScoreWeights};

/// Outcome of a classification pass, either heuristic or model-backed.
#[derive(Debug, Clone)]
pub struct Classification {
    pub category: &'static Category,
    pub score: u32,
    pub reasoning: String,
}

/// Scores the file against every category and returns the best one, or
/// general when nothing clears the floor. Ties keep the earliest category
/// in table order.
pub fn classify(file_name: &str, content: &str, weights: &ScoreWeights) -> Classification {
    let content_lower = content.to_lowercase();
    let name_lower = file_name.to_lowercase();

    let mut best: Option<(&'static Category, u32)> = None;
    for category in shared::category::candidates() {
        let score = score_category(category, &name_lower, content, &content_lower, weights);
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((category, score));
        }
    }

    let (category, score) = match best {
        Some((category, score)) if score >= weights.floor => (category, score),
        Some((_, score)) => (shared::category::general(), score),
        None => (shared::category::general(), 0),
    };

    Classification {
        category,
        score,
        reasoning: format!(
            "Keyword analysis: Score {}. Matched based on content analysis and filename patterns.",
            score
        ),
    }
}

fn score_category(
    category: &Category,
    name_lower: &str,
    content: &str,
    content_lower: &str,
    weights: &ScoreWeights,
) -> u32 {
    let mut score = 0u32;

    for keyword in category.keywords {
        let occurrences = content_lower.matches(keyword).count() as u32;
        score += occurrences * weights.keyword;
    }

    for pattern in category.patterns {
        if name_lower.contains(pattern) {
            score += weights.filename;
        }
    }

    score + structural_bonus(category, content, weights)
}

/// Signals stronger than any single keyword, matched case-sensitively
/// against the raw content: test runners shout, prose does not.
fn structural_bonus(category: &Category, content: &str, weights: &ScoreWeights) -> u32 {
    let hit = match category.name {
        "testing" => content.contains("PASS") || content.contains("FAIL"),
        "architecture" => content.contains("```mermaid") || content.contains("diagram"),
        "troubleshooting" => content.contains("Error:") || content.contains("Stack trace"),
        _ => false,
    };
    if hit {
        weights.structural
    } else {
        0
    }
}
