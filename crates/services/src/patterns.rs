//! The one glob-to-regex compiler, shared by the skip set, the JS
//! protected-path set, and the safe-utility name list.
//!
//! Supported constructs: `*` (within a path segment), `**` (across
//! segments), `?` (single character), `{a,b}` alternation. Everything else
//! is literal. Patterns containing `/` are tested against the whole
//! slash-normalized path, anchored on the left at a segment boundary and
//! open on the right, so `node_modules/*` covers the entire subtree. Bare
//! patterns are tested against the basename only, fully anchored.

use regex::Regex;
use tracing::warn;

/// One compiled glob.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    regex: Regex,
    dir_qualified: bool,
}

impl GlobPattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let dir_qualified = pattern.contains('/');
        let body = glob_to_regex(pattern);
        let anchored = if dir_qualified {
            format!("(?:^|/){}", body)
        } else {
            format!("^{}$", body)
        };
        Ok(Self {
            raw: pattern.to_string(),
            regex: Regex::new(&anchored)?,
            dir_qualified,
        })
    }

    /// The glob as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        if self.dir_qualified {
            self.regex.is_match(&normalized)
        } else {
            let basename = normalized.rsplit('/').next().unwrap_or(&normalized);
            self.regex.is_match(basename)
        }
    }
}

/// A list of globs compiled once and tested together. Globs that fail to
/// compile are dropped with a warning rather than failing the pipeline.
#[derive(Debug, Default)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    pub fn compile<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for raw in patterns {
            let raw = raw.as_ref();
            match GlobPattern::compile(raw) {
                Ok(pattern) => compiled.push(pattern),
                Err(err) => warn!("dropping unusable pattern {:?}: {}", raw, err),
            }
        }
        Self { patterns: compiled }
    }

    /// The first pattern matching the path, if any.
    pub fn first_match(&self, path: &str) -> Option<&GlobPattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Escapes regex metacharacters first, then expands glob constructs, so a
/// trailing `*.md` becomes `[^/]*\.md` and not `\.*\.md`.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::with_capacity(pattern.len() * 2);
    let mut in_brace = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    if chars.get(i + 2) == Some(&'/') {
                        // `**/` spans zero or more whole segments
                        regex.push_str("(?:[^/]+/)*");
                        i += 3;
                    } else {
                        regex.push_str(".*");
                        i += 2;
                    }
                    continue;
                }
                regex.push_str("[^/]*");
            }
            '?' => regex.push_str("[^/]"),
            '{' => {
                in_brace = true;
                regex.push_str("(?:");
            }
            '}' => {
                in_brace = false;
                regex.push(')');
            }
            ',' if in_brace => regex.push('|'),
            '.' | '+' | '(' | ')' | '|' | '^' | '$' | '[' | ']' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
        i += 1;
    }
    regex
}
