//! Classification buckets and the built-in table.

/// A classification bucket with an output directory.
///
/// `keywords` are matched case-insensitively against file content,
/// `patterns` as substrings of the lower-cased filename.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub dir: &'static str,
    pub keywords: &'static [&'static str],
    pub patterns: &'static [&'static str],
    pub description: &'static str,
}

/// Name of the fallback bucket.
pub const GENERAL: &str = "general";

/// Buckets in priority order; scoring ties favor the earliest entry.
/// `general` is last and never scored.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "testing",
        dir: "docs/testing",
        keywords: &[
            "test",
            "qa",
            "validation",
            "assertion",
            "expect",
            "describe",
            "coverage",
            "unit test",
            "integration test",
            "e2e",
            "passed",
            "failed",
        ],
        patterns: &["results", "report", "output", "execution"],
        description: "Test results, QA reports, validation outputs",
    },
    Category {
        name: "analysis",
        dir: "docs/analysis",
        keywords: &[
            "analysis",
            "metrics",
            "performance",
            "benchmark",
            "statistics",
            "data",
            "findings",
            "investigation",
        ],
        patterns: &["analysis", "report", "metrics", "performance"],
        description: "Data analysis, performance reports, investigations",
    },
    Category {
        name: "architecture",
        dir: "docs/architecture",
        keywords: &[
            "architecture",
            "design",
            "pattern",
            "structure",
            "component",
            "module",
            "system",
            "diagram",
            "flow",
        ],
        patterns: &["architecture", "design", "pattern", "structure"],
        description: "System design, technical architecture, patterns",
    },
    Category {
        name: "operations",
        dir: "docs/operations",
        keywords: &[
            "deploy",
            "deployment",
            "production",
            "staging",
            "release",
            "runbook",
            "operations",
            "devops",
            "ci/cd",
        ],
        patterns: &["deploy", "release", "runbook", "ops"],
        description: "Deployment guides, runbooks, operational docs",
    },
    Category {
        name: "development",
        dir: "docs/development",
        keywords: &[
            "implementation",
            "code",
            "api",
            "function",
            "class",
            "method",
            "development",
            "programming",
            "coding",
        ],
        patterns: &["implementation", "guide", "tutorial", "howto"],
        description: "Implementation details, code documentation",
    },
    Category {
        name: "planning",
        dir: "docs/planning",
        keywords: &[
            "plan",
            "roadmap",
            "specification",
            "requirements",
            "proposal",
            "strategy",
            "milestone",
            "timeline",
        ],
        patterns: &["plan", "roadmap", "spec", "proposal"],
        description: "Project plans, roadmaps, specifications",
    },
    Category {
        name: "troubleshooting",
        dir: "docs/troubleshooting",
        keywords: &[
            "debug",
            "error",
            "fix",
            "issue",
            "problem",
            "solution",
            "troubleshoot",
            "bug",
            "resolution",
        ],
        patterns: &["debug", "fix", "error", "issue"],
        description: "Debug logs, issue investigations, fixes",
    },
    Category {
        name: "scripts",
        dir: "scripts",
        keywords: &[
            "script",
            "bash",
            "shell",
            "automation",
            "command",
            "executable",
            "#!/bin/bash",
            "#!/bin/sh",
            "function",
            "variable",
        ],
        patterns: &["script", "automation", "command", "exec"],
        description: "Shell scripts and automation files",
    },
    Category {
        name: "general",
        dir: "docs/general",
        keywords: &[],
        patterns: &[],
        description: "Miscellaneous documentation",
    },
];

/// Looks up a bucket by name.
pub fn find(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// The fallback bucket.
pub fn general() -> &'static Category {
    &CATEGORIES[CATEGORIES.len() - 1]
}

/// Buckets eligible for scoring and model selection, i.e. all but `general`.
pub fn candidates() -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(|c| c.name != GENERAL)
}

/// Top-level directories organized files land under. A path already inside
/// one of these is never re-processed.
pub fn output_roots() -> Vec<&'static str> {
    let mut roots = Vec::new();
    for category in CATEGORIES {
        let root = category.dir.split('/').next().unwrap_or(category.dir);
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_is_last_and_empty() {
        let fallback = general();
        assert_eq!(fallback.name, GENERAL);
        assert!(fallback.keywords.is_empty());
        assert!(fallback.patterns.is_empty());
    }

    #[test]
    fn test_candidates_exclude_general() {
        assert_eq!(candidates().count(), CATEGORIES.len() - 1);
        assert!(candidates().all(|c| c.name != GENERAL));
    }

    #[test]
    fn test_output_roots() {
        assert_eq!(output_roots(), vec!["docs", "scripts"]);
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert_eq!(find("testing").map(|c| c.dir), Some("docs/testing"));
        assert!(find("cleanup").is_none());
    }
}
