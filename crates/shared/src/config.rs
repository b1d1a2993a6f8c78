//! Process configuration, resolved from the environment once at startup and
//! passed by reference into every component. No other module consults the
//! environment.

use std::env;
use std::path::PathBuf;

/// How JavaScript files are gated once JS organization is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsMode {
    /// Organize only on filename convention plus utility indicators.
    Safe,
    /// Ask the model, require high confidence, fail closed otherwise.
    Aggressive,
}

impl JsMode {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("aggressive") {
            JsMode::Aggressive
        } else {
            JsMode::Safe
        }
    }
}

/// Weights for the keyword classifier. The defaults are the tuning the
/// category table was written against; they are fields rather than
/// literals so a caller can re-tune without touching the classifier.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Per keyword occurrence in content.
    pub keyword: u32,
    /// Per filename-pattern substring match.
    pub filename: u32,
    /// Per category-specific structural signal.
    pub structural: u32,
    /// Best score below this falls through to `general`.
    pub floor: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: 2,
            filename: 10,
            structural: 15,
            floor: 5,
        }
    }
}

/// Hard limits for the JavaScript safety gate.
#[derive(Debug, Clone)]
pub struct JsGateLimits {
    /// Files at or above this size are presumed core code.
    pub max_content_bytes: usize,
    /// More import/require occurrences than this is disqualifying.
    pub max_imports: usize,
    /// Aggressive mode requires at least this reported confidence (0-100).
    pub min_ai_confidence: u8,
    /// Maximum directory depth below the base directory.
    pub max_depth: usize,
}

impl Default for JsGateLimits {
    fn default() -> Self {
        Self {
            max_content_bytes: 10_000,
            max_imports: 5,
            min_ai_confidence: 95,
            max_depth: 2,
        }
    }
}

/// Which model transports to try, and how long to wait for them.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Assistant CLI binary invoked with the prompt as its argument.
    pub agent_cmd: String,
    /// Transport order, e.g. ["cli", "ollama"].
    pub preference: Vec<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            agent_cmd: "claude".to_string(),
            preference: vec!["cli".to_string(), "ollama".to_string()],
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2:3b".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Everything the pipeline needs to know for one invocation.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    pub bypass_enabled: bool,
    pub debug_enabled: bool,
    /// Directory organized files are placed under; defaults to the cwd the
    /// hook was invoked in, which is the project root.
    pub base_dir: PathBuf,
    pub log_path: PathBuf,
    pub skip_patterns: Vec<String>,
    pub js_enabled: bool,
    pub js_mode: JsMode,
    pub weights: ScoreWeights,
    pub js_limits: JsGateLimits,
    pub model: ModelSettings,
}

impl OrganizeConfig {
    /// Defaults for a given base directory, environment ignored. Tests
    /// build on this.
    pub fn new(base_dir: PathBuf) -> Self {
        let log_path = base_dir.join("docs").join("organization-log.json");
        Self {
            bypass_enabled: false,
            debug_enabled: false,
            base_dir,
            log_path,
            skip_patterns: default_skip_patterns(),
            js_enabled: false,
            js_mode: JsMode::Safe,
            weights: ScoreWeights::default(),
            js_limits: JsGateLimits::default(),
            model: ModelSettings::default(),
        }
    }

    /// Reads the `DOCSORT_*` variables on top of the defaults. Called once
    /// in main; everything downstream takes `&OrganizeConfig`.
    pub fn from_env() -> Self {
        let base_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Self::new(base_dir);

        config.bypass_enabled = env_flag("DOCSORT_BYPASS");
        config.debug_enabled = env_flag("DOCSORT_DEBUG");
        config.js_enabled = env_flag("DOCSORT_JS");
        if let Ok(mode) = env::var("DOCSORT_JS_MODE") {
            config.js_mode = JsMode::parse(&mode);
        }
        if let Ok(path) = env::var("DOCSORT_LOG_PATH") {
            if !path.trim().is_empty() {
                config.log_path = expand_home(path.trim());
            }
        }
        if let Ok(raw) = env::var("DOCSORT_SKIP_PATTERNS") {
            let custom = split_list(&raw);
            if !custom.is_empty() {
                config.skip_patterns = custom;
            }
        }
        if let Ok(cmd) = env::var("DOCSORT_MODEL_CMD") {
            if !cmd.trim().is_empty() {
                config.model.agent_cmd = cmd.trim().to_string();
            }
        }
        if let Ok(raw) = env::var("DOCSORT_MODEL_PREFERENCE") {
            let order = split_list(&raw);
            if !order.is_empty() {
                config.model.preference = order;
            }
        }
        if let Ok(url) = env::var("DOCSORT_OLLAMA_URL") {
            if !url.trim().is_empty() {
                config.model.ollama_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(model) = env::var("DOCSORT_OLLAMA_MODEL") {
            if !model.trim().is_empty() {
                config.model.ollama_model = model.trim().to_string();
            }
        }
        if let Ok(raw) = env::var("DOCSORT_MODEL_TIMEOUT_SECS") {
            if let Ok(secs) = raw.trim().parse::<u64>() {
                if secs > 0 {
                    config.model.timeout_secs = secs;
                }
            }
        }
        config
    }
}

fn env_flag(name: &str) -> bool {
    matches!(env::var(name).ok().as_deref(), Some("true") | Some("1"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

/// User-supplied paths may start with `~/`; resolve against the home
/// directory, leave everything else untouched.
fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// The built-in skip set: files and directories that must never be
/// relocated, however well their content scores.
pub fn default_skip_patterns() -> Vec<String> {
    DEFAULT_SKIP_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    // Documentation that stays at the project root
    "README*",
    "readme*",
    "LICENSE*",
    "CONTRIBUTING*",
    "CODE_OF_CONDUCT*",
    "CHANGELOG*",
    "SECURITY*",
    "AUTHORS",
    "CONTRIBUTORS",
    "NOTICE",
    "CITATION*",
    // Version control
    ".git/*",
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".gitkeep",
    // Package management
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    ".npmrc",
    "lerna.json",
    "pnpm-workspace.yaml",
    "composer.json",
    "composer.lock",
    "Gemfile",
    "Gemfile.lock",
    "go.mod",
    "go.sum",
    "requirements*.txt",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "*.toml",
    // Build output
    "dist/*",
    "build/*",
    "out/*",
    "lib/*",
    "bin/*",
    "target/*",
    ".next/*",
    ".nuxt/*",
    ".output/*",
    ".svelte-kit/*",
    "public/*",
    "static/*",
    "_site/*",
    "docs/.vitepress/dist/*",
    "site/*",
    // IDE and editor state
    ".vscode/*",
    ".idea/*",
    "*.iml",
    "*.swp",
    "*.swo",
    "*~",
    ".project",
    ".classpath",
    ".settings/*",
    // Test output and coverage
    "coverage/*",
    ".nyc_output/*",
    "test-results/*",
    "__tests__/*",
    "__mocks__/*",
    "__snapshots__/*",
    ".pytest_cache/*",
    ".tox/*",
    "htmlcov/*",
    ".coverage",
    "coverage.xml",
    "*.lcov",
    // CI and deployment
    ".github/*",
    ".gitlab/*",
    ".gitlab-ci.yml",
    ".travis.yml",
    ".circleci/*",
    "Jenkinsfile",
    "azure-pipelines.yml",
    "cloudbuild.yaml",
    "vercel.json",
    "netlify.toml",
    "firebase.json",
    "app.yaml",
    "Procfile",
    "fly.toml",
    // Containers
    "Dockerfile*",
    "docker-compose*.yml",
    "docker-compose*.yaml",
    ".dockerignore",
    "kubernetes/*",
    "k8s/*",
    "helm/*",
    "charts/*",
    "docker/*",
    "skaffold.yaml",
    // Monorepo and workspace layout
    "nx.json",
    "workspace.json",
    "turbo.json",
    ".turbo/*",
    "packages/*",
    "apps/*",
    "libs/*",
    "tools/*",
    ".changeset/*",
    ".yarn/*",
    // Tool configuration
    ".editorconfig",
    ".prettierrc*",
    ".prettierignore",
    "prettier.config.*",
    ".eslintrc*",
    ".eslintignore",
    "eslint.config.*",
    ".stylelintrc*",
    ".babelrc*",
    "babel.config.*",
    "tsconfig*.json",
    "jsconfig*.json",
    "webpack.config.*",
    "rollup.config.*",
    "vite.config.*",
    "gulpfile.*",
    "Gruntfile.*",
    "karma.conf.*",
    "postcss.config.*",
    "tailwind.config.*",
    "jest.config.*",
    "jest.setup.*",
    "vitest.config.*",
    "cypress.config.*",
    "playwright.config.*",
    ".mocharc*",
    // Environment and secrets
    ".env",
    ".env.*",
    "*.pem",
    "*.key",
    "*.cert",
    "*.crt",
    "*.p12",
    ".secrets/*",
    "secrets/*",
    ".htaccess",
    "private/*",
    // Databases and data directories
    "*.db",
    "*.sqlite",
    "*.sqlite3",
    "*.sql",
    "migrations/*",
    "seeds/*",
    "data/*",
    "database/*",
    // Caches and scratch directories
    ".cache/*",
    "tmp/*",
    "temp/*",
    ".parcel-cache/*",
    ".eslintcache",
    ".sass-cache/*",
    ".npm/*",
    ".pnpm-store/*",
    // Dependencies and virtual environments
    "node_modules/*",
    "vendor/*",
    "bower_components/*",
    "venv/*",
    "env/*",
    ".venv/*",
    "virtualenv/*",
    ".bundle/*",
    "site-packages/*",
    "__pycache__/*",
    "*.egg-info/*",
    ".mypy_cache/*",
    // OS artifacts
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "._*",
    ".Trash-*",
    ".nfs*",
    // Logs and process droppings
    "*.log",
    "logs/*",
    "*.log.*",
    "npm-debug.log*",
    "yarn-error.log*",
    "*.pid",
    "*.seed",
    // Binaries and archives
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.o",
    "*.class",
    "*.jar",
    "*.zip",
    "*.tar",
    "*.tar.gz",
    "*.tgz",
    "*.rar",
    "*.7z",
    "*.dmg",
    "*.iso",
    "*.deb",
    "*.rpm",
    "*.whl",
    // Infrastructure as code
    ".terraform/*",
    "*.tfstate",
    "*.tfstate.*",
    "*.tfvars",
    "Vagrantfile",
    "serverless.yml",
    ".serverless/*",
    "Pulumi.yaml",
    // Assistant state
    ".claude/*",
    "CLAUDE.md",
    "claude.md",
    ".claude.json",
    "AGENTS.md",
    ".ai/*",
    ".openai/*",
    ".anthropic/*",
    // Lock files and backups
    "*.lock",
    "*-lock.*",
    "*.tmp",
    "*.temp",
    "*.bak",
    "*.backup",
    "*.old",
    "*.orig",
    "*.rej",
    // Hidden directories
    ".*/*",
];
