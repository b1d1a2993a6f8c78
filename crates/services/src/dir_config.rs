//! Per-directory overrides read from a `.docsort.json` dropped next to the
//! files being organized.
//!
//! Overrides extend rather than replace the built-in skip list, and can
//! flip script handling on or off for one project without touching the
//! environment.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::Deserialize;
use shared::{JsMode, OrganizeConfig};
use tracing::warn;

/// Name of the override file, looked up in the organization base directory.
pub const DIR_CONFIG_FILE: &str = ".docsort.json";

/// Maximum directories whose overrides are kept in memory.
const CACHE_SIZE: usize = 64;

/// Optional knobs a project can set locally. Absent fields leave the
/// process-wide configuration untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirOverrides {
    pub skip_patterns: Vec<String>,
    pub js_enabled: Option<bool>,
    pub js_mode: Option<String>,
}

impl DirOverrides {
    /// Folds the overrides into a resolved configuration. Skip patterns
    /// are appended after the built-ins so both keep matching.
    pub fn apply(&self, config: &mut OrganizeConfig) {
        config
            .skip_patterns
            .extend(self.skip_patterns.iter().cloned());
        if let Some(enabled) = self.js_enabled {
            config.js_enabled = enabled;
        }
        if let Some(mode) = &self.js_mode {
            config.js_mode = JsMode::parse(mode);
        }
    }
}

/// Overrides keyed by base directory, loaded once per directory and held
/// for the life of the process. Oldest directory falls out when the cache
/// is full.
pub struct DirConfigCache {
    inner: RwLock<CacheInner>,
    capacity: usize,
}

struct CacheInner {
    overrides: HashMap<PathBuf, DirOverrides>,
    order: VecDeque<PathBuf>,
}

impl DirConfigCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                overrides: HashMap::new(),
                order: VecDeque::with_capacity(capacity),
            }),
            capacity,
        }
    }

    /// Overrides for the given base directory, reading `.docsort.json` on
    /// first access.
    pub fn load(&self, base_dir: &Path) -> DirOverrides {
        {
            let inner = self.inner.read();
            if let Some(cached) = inner.overrides.get(base_dir) {
                return cached.clone();
            }
        }

        let loaded = read_overrides(&base_dir.join(DIR_CONFIG_FILE));

        let mut inner = self.inner.write();
        if !inner.overrides.contains_key(base_dir) {
            if inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.overrides.remove(&oldest);
                }
            }
            inner.order.push_back(base_dir.to_path_buf());
            inner
                .overrides
                .insert(base_dir.to_path_buf(), loaded.clone());
        }
        loaded
    }
}

impl Default for DirConfigCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A missing file means no overrides. A present but unparseable file is
/// reported and ignored so one bad edit cannot stall organization.
fn read_overrides(path: &Path) -> DirOverrides {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return DirOverrides::default(),
    };
    match serde_json::from_str(&raw) {
        Ok(overrides) => overrides,
        Err(err) => {
            warn!("ignoring malformed {}: {}", path.display(), err);
            DirOverrides::default()
        }
    }
}
