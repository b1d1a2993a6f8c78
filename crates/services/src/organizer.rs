//! The pipeline that decides what happens to one written file: a chain of
//! cheap checks, then classification, then the move and its audit entry.
//!
//! Every outcome is a result with a reason, never an error. A hook that
//! crashes or blocks would be worse than a file left unorganized.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::Deserialize;
use shared::{
    ModelClient, OrganizationLogEntry, OrganizationResult, OrganizeConfig, ToolOperation,
};
use tracing::{debug, warn};

use crate::classifier::{self, Classification};
use crate::dir_config::DirConfigCache;
use crate::extract;
use crate::js_gate;
use crate::org_log;
use crate::patterns::PatternSet;
use crate::prompts;

const SUPPORTED_EXTENSIONS: &[&str] = &[".md", ".sh", ".js", ".mjs"];

/// Orchestrates skip checks, classification, and the move for each file
/// event. One instance lives for the whole process.
pub struct Organizer {
    config: OrganizeConfig,
    model: Arc<dyn ModelClient>,
    dir_configs: DirConfigCache,
}

impl Organizer {
    pub fn new(config: OrganizeConfig, model: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            model,
            dir_configs: DirConfigCache::new(),
        }
    }

    /// Runs the full pipeline for one tool operation and reports what was
    /// done and why.
    pub async fn organize(&self, operation: &ToolOperation) -> OrganizationResult {
        let file_path = operation.file_path();
        let file_name = file_name_of(file_path);

        if self.config.bypass_enabled {
            return OrganizationResult::skipped("Organization bypassed via DOCSORT_BYPASS");
        }

        let mut config = self.config.clone();
        self.dir_configs
            .load(&self.config.base_dir)
            .apply(&mut config);

        // Directory-qualified skip patterns describe the project tree, so
        // they are tested against the path below the base, not against
        // whatever ancestors the base itself happens to have.
        let skip_path = Path::new(file_path)
            .strip_prefix(&config.base_dir)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| file_path.to_string());
        let skip_set = PatternSet::compile(&config.skip_patterns);
        if skip_set.is_match(&skip_path) {
            return OrganizationResult::skipped(format!(
                "File {} matches skip pattern",
                file_name
            ));
        }

        if already_organized(file_path) {
            return OrganizationResult::skipped("File already organized");
        }

        if !supported_extension(file_name) {
            return OrganizationResult::skipped("Not a supported file type");
        }

        // The on-disk file is ground truth once the tool has run; the event
        // payload may be a partial edit.
        let bytes = match fs::read(file_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return OrganizationResult::skipped("File not found - may still be writing");
            }
            Err(err) => {
                return OrganizationResult::skipped(format!("Organization error: {}", err));
            }
        };
        let content = String::from_utf8_lossy(&bytes).into_owned();

        if is_script(file_name) {
            if !config.js_enabled {
                return OrganizationResult::skipped(
                    "JS organization is disabled (set DOCSORT_JS=true to enable)",
                );
            }
            let verdict =
                js_gate::evaluate(file_path, &content, &config, self.model.as_ref()).await;
            if !verdict.organize {
                return OrganizationResult::skipped(verdict.reason);
            }
        }

        let classification = self.analyze(file_name, &content, &config).await;
        let category = classification.category;

        let target_dir = config.base_dir.join(category.dir);
        let intended = target_dir.join(file_name);
        if Path::new(file_path) == intended.as_path() {
            return OrganizationResult::skipped("File already organized");
        }

        if let Err(err) = fs::create_dir_all(&target_dir) {
            return OrganizationResult::skipped(format!("Organization error: {}", err));
        }
        let target_path = unique_target(&intended);
        match fs::rename(file_path, &target_path) {
            Ok(()) => {}
            // The source can vanish between the read and the move; that is
            // the same race as the missing read above.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return OrganizationResult::skipped("File not found - may still be writing");
            }
            Err(err) => {
                return OrganizationResult::skipped(format!("Organization error: {}", err));
            }
        }

        let entry = OrganizationLogEntry::new(
            file_path,
            &target_path.to_string_lossy(),
            category.name,
            classification.score,
            &classification.reasoning,
        );
        if let Err(err) = org_log::append(&config.log_path, &entry) {
            warn!("organization log append failed: {}", err);
        }
        debug!(
            "organized {} -> {} ({}, score {})",
            entry.original_path, entry.new_path, entry.category, entry.score
        );

        OrganizationResult::organized(category.dir)
    }

    /// Model first, keyword scoring when the model is unavailable or its
    /// answer is unusable.
    async fn analyze(
        &self,
        file_name: &str,
        content: &str,
        config: &OrganizeConfig,
    ) -> Classification {
        match self.ask_model(file_name, content).await {
            Some(classification) => classification,
            None => classifier::classify(file_name, content, &config.weights),
        }
    }

    async fn ask_model(&self, file_name: &str, content: &str) -> Option<Classification> {
        let prompt = prompts::categorize_file(file_name, content);
        let reply = match self.model.ask(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("model categorization failed, using keyword analysis: {}", err);
                return None;
            }
        };

        let parsed: CategoryReply = extract::json_object(&reply)?;
        let category = shared::category::find(&parsed.category)?;
        if category.name == shared::category::GENERAL {
            // The menu never offers general; a model that answers it is
            // telling us it could not decide.
            return None;
        }

        let reasoning = if parsed.reasoning.is_empty() {
            "Categorized by AI analysis".to_string()
        } else {
            parsed.reasoning
        };
        Some(Classification {
            category,
            score: (parsed.confidence.clamp(0.0, 1.0) * 100.0).round() as u32,
            reasoning: format!("AI ({}): {}", self.model.name(), reasoning),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CategoryReply {
    category: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

fn default_confidence() -> f64 {
    0.5
}

fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn supported_extension(file_name: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

fn is_script(file_name: &str) -> bool {
    file_name.ends_with(".js") || file_name.ends_with(".mjs")
}

/// A path under any output root was produced by an earlier run; touching
/// it again would bounce files between categories.
fn already_organized(file_path: &str) -> bool {
    let normalized = file_path.replace('\\', "/");
    shared::category::output_roots().iter().any(|root| {
        normalized.contains(&format!("/{}/", root)) || normalized.starts_with(&format!("{}/", root))
    })
}

/// Never clobber: an occupied target gets the incoming file under a
/// timestamped name instead.
fn unique_target(intended: &Path) -> PathBuf {
    if !intended.exists() {
        return intended.to_path_buf();
    }
    let stem = intended
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let name = match intended.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, stamp, ext),
        None => format!("{}-{}", stem, stamp),
    };
    intended.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ModelError;
    use tempfile::TempDir;

    struct FixedReply(&'static str);

    #[async_trait::async_trait]
    impl ModelClient for FixedReply {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn ask(&self, _prompt: &str) -> Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    struct NoModel;

    #[async_trait::async_trait]
    impl ModelClient for NoModel {
        fn name(&self) -> &str {
            "none"
        }

        async fn ask(&self, _prompt: &str) -> Result<String, ModelError> {
            Err(ModelError::Unavailable("not configured".to_string()))
        }
    }

    /// Removes the source file while it is being classified, so the
    /// pipeline reaches the move with nothing left to move.
    struct DeleteWhileAsked(PathBuf);

    #[async_trait::async_trait]
    impl ModelClient for DeleteWhileAsked {
        fn name(&self) -> &str {
            "deleting"
        }

        async fn ask(&self, _prompt: &str) -> Result<String, ModelError> {
            fs::remove_file(&self.0).unwrap();
            Err(ModelError::Unavailable("not configured".to_string()))
        }
    }

    fn setup() -> (TempDir, OrganizeConfig) {
        let dir = TempDir::new().unwrap();
        let config = OrganizeConfig::new(dir.path().to_path_buf());
        (dir, config)
    }

    fn organizer(config: OrganizeConfig) -> Organizer {
        Organizer::new(config, Arc::new(NoModel))
    }

    fn write_op(dir: &TempDir, name: &str, content: &str) -> ToolOperation {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        ToolOperation::Write {
            file_path: path.to_string_lossy().into_owned(),
            content: content.to_string(),
        }
    }

    const TEST_REPORT: &str =
        "# Test Run\n\nAll integration test suites PASS.\nCoverage: 91 percent.\n";

    #[tokio::test]
    async fn test_bypass_leaves_file_alone() {
        let (dir, mut config) = setup();
        config.bypass_enabled = true;
        let op = write_op(&dir, "summary.md", TEST_REPORT);

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "Organization bypassed via DOCSORT_BYPASS");
        assert!(result.decision.is_none());
        assert!(dir.path().join("summary.md").exists());
    }

    #[tokio::test]
    async fn test_skip_pattern_blocks_readme() {
        let (dir, config) = setup();
        let op = write_op(&dir, "README.md", "# Project\n");

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "File README.md matches skip pattern");
        assert!(dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn test_already_organized_path_is_skipped() {
        let (dir, config) = setup();
        let docs = dir.path().join("docs").join("testing");
        fs::create_dir_all(&docs).unwrap();
        let path = docs.join("report.md");
        fs::write(&path, TEST_REPORT).unwrap();
        let op = ToolOperation::Write {
            file_path: path.to_string_lossy().into_owned(),
            content: TEST_REPORT.to_string(),
        };

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "File already organized");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_skipped() {
        let (dir, config) = setup();
        let op = write_op(&dir, "notes.txt", "just text");

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "Not a supported file type");
    }

    #[tokio::test]
    async fn test_missing_file_is_benign() {
        let (dir, config) = setup();
        let op = ToolOperation::Write {
            file_path: dir
                .path()
                .join("vanished.md")
                .to_string_lossy()
                .into_owned(),
            content: String::new(),
        };

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "File not found - may still be writing");
    }

    #[tokio::test]
    async fn test_file_deleted_mid_pipeline_is_benign() {
        let (dir, config) = setup();
        let op = write_op(&dir, "run-results.md", TEST_REPORT);
        let model = DeleteWhileAsked(dir.path().join("run-results.md"));
        let organizer = Organizer::new(config, Arc::new(model));

        let result = organizer.organize(&op).await;

        assert_eq!(result.reason, "File not found - may still be writing");
        assert!(!dir
            .path()
            .join("docs")
            .join("testing")
            .join("run-results.md")
            .exists());
    }

    #[tokio::test]
    async fn test_keyword_fallback_moves_test_report() {
        let (dir, config) = setup();
        let op = write_op(&dir, "run-results.md", TEST_REPORT);

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "Organized to docs/testing");
        assert!(!dir.path().join("run-results.md").exists());
        assert!(dir
            .path()
            .join("docs")
            .join("testing")
            .join("run-results.md")
            .exists());
    }

    #[tokio::test]
    async fn test_model_reply_drives_category_and_log() {
        let (dir, config) = setup();
        let log_path = config.log_path.clone();
        let model = FixedReply(
            r#"{"category": "planning", "confidence": 0.9, "reasoning": "roadmap for Q3"}"#,
        );
        let organizer = Organizer::new(config, Arc::new(model));
        let op = write_op(&dir, "q3.md", "vague content the keywords would miss");

        let result = organizer.organize(&op).await;

        assert_eq!(result.reason, "Organized to docs/planning");
        let entries = org_log::read_entries(&log_path);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, "planning");
        assert_eq!(entries[0].score, 90);
        assert_eq!(entries[0].reasoning, "AI (fixed): roadmap for Q3");
    }

    #[tokio::test]
    async fn test_unknown_model_category_falls_back_to_keywords() {
        let (dir, config) = setup();
        let model = FixedReply(r#"{"category": "cleanup", "confidence": 0.99, "reasoning": "x"}"#);
        let organizer = Organizer::new(config, Arc::new(model));
        let op = write_op(&dir, "run-results.md", TEST_REPORT);

        let result = organizer.organize(&op).await;

        assert_eq!(result.reason, "Organized to docs/testing");
    }

    #[tokio::test]
    async fn test_general_model_answer_falls_back_to_keywords() {
        let (dir, config) = setup();
        let model = FixedReply(r#"{"category": "general", "confidence": 0.9, "reasoning": "x"}"#);
        let organizer = Organizer::new(config, Arc::new(model));
        let op = write_op(&dir, "run-results.md", TEST_REPORT);

        let result = organizer.organize(&op).await;

        assert_eq!(result.reason, "Organized to docs/testing");
    }

    #[tokio::test]
    async fn test_js_is_skipped_unless_enabled() {
        let (dir, config) = setup();
        let op = write_op(&dir, "check-db.js", "console.log('hi');\n");

        let result = organizer(config).organize(&op).await;

        assert_eq!(
            result.reason,
            "JS organization is disabled (set DOCSORT_JS=true to enable)"
        );
        assert!(dir.path().join("check-db.js").exists());
    }

    #[tokio::test]
    async fn test_safe_mode_utility_script_lands_in_scripts() {
        let (dir, mut config) = setup();
        config.js_enabled = true;
        let model = FixedReply(
            r#"{"category": "scripts", "confidence": 0.8, "reasoning": "db check utility"}"#,
        );
        let organizer = Organizer::new(config, Arc::new(model));
        let op = write_op(
            &dir,
            "check-db.js",
            "#!/usr/bin/env node\nconsole.log('checking');\nprocess.exit(0);\n",
        );

        let result = organizer.organize(&op).await;

        assert_eq!(result.reason, "Organized to scripts");
        assert!(dir.path().join("scripts").join("check-db.js").exists());
    }

    #[tokio::test]
    async fn test_gated_js_stays_put() {
        let (dir, mut config) = setup();
        config.js_enabled = true;
        let op = write_op(
            &dir,
            "helper.js",
            "#!/usr/bin/env node\nconsole.log('hi');\n",
        );

        let result = organizer(config).organize(&op).await;

        assert!(result.reason.contains("naming convention"));
        assert!(dir.path().join("helper.js").exists());
    }

    #[tokio::test]
    async fn test_collision_gets_timestamp_suffix() {
        let (dir, config) = setup();
        let testing_dir = dir.path().join("docs").join("testing");
        fs::create_dir_all(&testing_dir).unwrap();
        fs::write(testing_dir.join("run-results.md"), "earlier run").unwrap();
        let op = write_op(&dir, "run-results.md", TEST_REPORT);

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "Organized to docs/testing");
        let names: Vec<String> = fs::read_dir(&testing_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n == "run-results.md"));
        assert!(names
            .iter()
            .any(|n| n.starts_with("run-results-") && n.ends_with(".md")));
        assert_eq!(
            fs::read_to_string(testing_dir.join("run-results.md")).unwrap(),
            "earlier run"
        );
    }

    #[tokio::test]
    async fn test_log_accumulates_in_order() {
        let (dir, config) = setup();
        let log_path = config.log_path.clone();
        let organizer = organizer(config);

        let first = write_op(&dir, "first-results.md", TEST_REPORT);
        organizer.organize(&first).await;
        let second = write_op(&dir, "second-results.md", TEST_REPORT);
        organizer.organize(&second).await;

        let entries = org_log::read_entries(&log_path);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].original_path.ends_with("first-results.md"));
        assert!(entries[1].original_path.ends_with("second-results.md"));
    }

    #[tokio::test]
    async fn test_replayed_event_is_benign() {
        let (dir, config) = setup();
        let organizer = organizer(config);
        let op = write_op(&dir, "run-results.md", TEST_REPORT);

        let first = organizer.organize(&op).await;
        assert_eq!(first.reason, "Organized to docs/testing");

        let second = organizer.organize(&op).await;
        assert_eq!(second.reason, "File not found - may still be writing");
    }

    #[tokio::test]
    async fn test_dir_overrides_extend_skip_set() {
        let (dir, config) = setup();
        fs::write(
            dir.path().join(".docsort.json"),
            r#"{"skip_patterns": ["SCRATCH*"]}"#,
        )
        .unwrap();
        let op = write_op(&dir, "SCRATCH-notes.md", TEST_REPORT);

        let result = organizer(config).organize(&op).await;

        assert_eq!(result.reason, "File SCRATCH-notes.md matches skip pattern");
        assert!(dir.path().join("SCRATCH-notes.md").exists());
    }
}
