//! Safety gate for JavaScript and MJS files. Moving a script the
//! application still imports breaks the build, so every pass here fails
//! closed: unless the file positively proves it is a throwaway utility it
//! stays where it is.
//!
//! Passes run in order: protected paths, location depth, size, module
//! syntax, production code signatures, utility indicators, then the final
//! mode-specific decision. The first failing pass ends the evaluation.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use shared::{JsMode, ModelClient, OrganizeConfig};
use tracing::debug;

use crate::extract;
use crate::patterns::PatternSet;
use crate::prompts;

/// Paths never organized no matter what their content says.
static PROTECTED_PATHS: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::compile([
        // Core application structure
        "src/**/*.{js,mjs,ts,tsx}",
        "lib/**/*.{js,mjs}",
        "dist/**/*.{js,mjs}",
        "build/**/*.{js,mjs}",
        // Framework and build files
        "*.config.{js,mjs}",
        "**/index.{js,mjs}",
        "**/main.{js,mjs}",
        "**/app.{js,mjs}",
        // Package entry points
        "server.{js,mjs}",
        "client.{js,mjs}",
        "index.{js,mjs}",
        // Test suites have structure tooling depends on
        "**/*.test.{js,mjs}",
        "**/*.spec.{js,mjs}",
        "__tests__/**/*",
        // Dependencies
        "node_modules/**/*",
        "vendor/**/*",
        ".next/**/*",
        ".nuxt/**/*",
    ])
});

/// Filename conventions that mark a script as a one-off utility.
static SAFE_NAMES: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::compile([
        "check-*.{js,mjs}",
        "test-*.{js,mjs}",
        "debug-*.{js,mjs}",
        "analyze-*.{js,mjs}",
        "create-test-*.{js,mjs}",
        "validate-*.{js,mjs}",
        "cleanup-*.{js,mjs}",
        "fix-*.{js,mjs}",
        "diagnose-*.{js,mjs}",
        "backup-*.{js,mjs}",
        "migrate-*.{js,mjs}",
        "seed-*.{js,mjs}",
        "generate-*.{js,mjs}",
        "temp-*.{js,mjs}",
        "tmp-*.{js,mjs}",
        "draft-*.{js,mjs}",
        "old-*.{js,mjs}",
        "deprecated-*.{js,mjs}",
    ])
});

/// Signatures of code other files depend on. One match disqualifies.
static PRODUCTION_SIGNATURES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"export\s+(default|\{|function|class|const)",
        r"module\.exports\s*=",
        r"exports\.\w+\s*=",
        r"class\s+\w+\s+extends\s+Component",
        r"class\s+\w+\s+extends\s+React",
        r"@Controller\(",
        r"@Injectable\(",
        r"@Module\(",
        r"router\.(get|post|put|delete|patch)",
        r"app\.(get|post|put|delete|patch)",
        r"mongoose\.model\(",
        r"sequelize\.define\(",
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Signatures of a self-contained command-line script.
static UTILITY_SIGNATURES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^#!",
        r"process\.exit\(",
        r"console\.(log|error|warn|info)",
        r"process\.argv",
        r#"require\(['"]commander['"]\)"#,
        r#"require\(['"]yargs['"]\)"#,
        r#"import .* from ['"]commander['"]"#,
        r#"import .* from ['"]yargs['"]"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static EXPORT_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)export|module\.exports").unwrap());

/// Outcome of the gate. A negative verdict carries the pass that failed.
#[derive(Debug)]
pub struct GateVerdict {
    pub organize: bool,
    pub reason: String,
}

impl GateVerdict {
    fn accept(reason: impl Into<String>) -> Self {
        Self {
            organize: true,
            reason: reason.into(),
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Self {
            organize: false,
            reason: reason.into(),
        }
    }
}

/// Runs every pass against the file. The model is consulted only in
/// aggressive mode, and only for files that survive the static passes.
pub async fn evaluate(
    file_path: &str,
    content: &str,
    config: &OrganizeConfig,
    model: &dyn ModelClient,
) -> GateVerdict {
    if let Some(pattern) = PROTECTED_PATHS.first_match(file_path) {
        return GateVerdict::reject(format!(
            "Script matches protected pattern {}",
            pattern.raw()
        ));
    }

    if !within_safe_depth(file_path, &config.base_dir, config.js_limits.max_depth) {
        return GateVerdict::reject(
            "Script is outside the project root or nested too deep to be a utility",
        );
    }

    if content.len() >= config.js_limits.max_content_bytes {
        return GateVerdict::reject(format!(
            "Script is {} bytes, too large for a throwaway utility",
            content.len()
        ));
    }

    if EXPORT_SYNTAX.is_match(content) {
        return GateVerdict::reject("Script exports symbols other code may import");
    }
    let imports = content.matches("import").count() + content.matches("require").count();
    if imports > config.js_limits.max_imports {
        return GateVerdict::reject(format!(
            "Script pulls in {} modules, more than a utility needs",
            imports
        ));
    }

    if let Some(signature) = PRODUCTION_SIGNATURES.iter().find(|r| r.is_match(content)) {
        return GateVerdict::reject(format!(
            "Script matches production code signature {}",
            signature.as_str()
        ));
    }

    let has_utility_marker = UTILITY_SIGNATURES.iter().any(|r| r.is_match(content));
    let file_name = file_path.rsplit('/').next().unwrap_or(file_path);
    let safe_name = SAFE_NAMES.is_match(file_name);

    if !has_utility_marker && !safe_name {
        return GateVerdict::reject("Script shows no utility indicators");
    }

    match config.js_mode {
        JsMode::Safe => {
            if !safe_name {
                GateVerdict::reject("Script name does not follow a utility naming convention")
            } else if !has_utility_marker {
                GateVerdict::reject("Script name looks like a utility but its content does not")
            } else {
                GateVerdict::accept("Utility naming convention and script indicators present")
            }
        }
        JsMode::Aggressive => confirm_with_model(file_path, content, config, model).await,
    }
}

/// The file must sit under the base directory, at most `max_depth`
/// directory levels down. Anything outside the base is rejected outright,
/// and a `..` component anywhere counts as outside; the prefix check is
/// lexical and never resolves one.
fn within_safe_depth(file_path: &str, base_dir: &Path, max_depth: usize) -> bool {
    let path = Path::new(file_path);
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return false;
    }
    let relative = if path.is_absolute() {
        match path.strip_prefix(base_dir) {
            Ok(relative) => relative,
            Err(_) => return false,
        }
    } else {
        path
    };

    let depth = relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
        .saturating_sub(1);
    depth <= max_depth
}

#[derive(Debug, Deserialize)]
struct SafetyReply {
    decision: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

async fn confirm_with_model(
    file_path: &str,
    content: &str,
    config: &OrganizeConfig,
    model: &dyn ModelClient,
) -> GateVerdict {
    let prompt = prompts::js_safety(file_path, content);
    let reply = match model.ask(&prompt).await {
        Ok(reply) => reply,
        Err(err) => {
            return GateVerdict::reject(format!("Safety analysis unavailable: {}", err));
        }
    };
    debug!("safety analysis reply for {}: {}", file_path, reply);

    let verdict: SafetyReply = match extract::json_object(&reply) {
        Some(verdict) => verdict,
        None => return GateVerdict::reject("Safety analysis reply could not be parsed"),
    };

    let required = config.js_limits.min_ai_confidence as f64;
    if verdict.decision != "organize" {
        let why = if verdict.reasoning.is_empty() {
            "no reasoning given".to_string()
        } else {
            verdict.reasoning
        };
        GateVerdict::reject(format!("Safety analysis declined to organize: {}", why))
    } else if verdict.confidence < required {
        GateVerdict::reject(format!(
            "Safety analysis confidence {} is below the required {}",
            verdict.confidence, required
        ))
    } else {
        GateVerdict::accept(format!(
            "Safety analysis approved organization with confidence {}",
            verdict.confidence
        ))
    }
}
