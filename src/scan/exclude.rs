//! Path exclusion rules for project scans.

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::path::{Component, Path};

use crate::config::ConfigError;

/// Directory names skipped by default.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".venv",
    "venv",
    "env",
    "node_modules",
    ".pytest_cache",
    ".tox",
    "dist",
    "build",
    ".mypy_cache",
    ".coverage",
];

/// Path regexes skipped by default.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[r".*\.pyc$", r".*__pycache__.*", r".*\.egg-info.*"];

/// Decides which discovered files are left out of a scan.
///
/// All checks run against the path relative to the scan root.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    dirs: Vec<String>,
    patterns: Vec<Regex>,
    globs: GlobSet,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect(),
            patterns: compile_patterns(DEFAULT_EXCLUDE_PATTERNS),
            globs: GlobSet::empty(),
        }
    }
}

impl ExclusionRules {
    /// Build rules. `None` lists fall back to the defaults; a given list
    /// replaces them.
    ///
    /// Invalid regexes are logged and dropped so one bad pattern never
    /// aborts a scan. Invalid globs are a configuration error.
    pub fn new(
        dirs: Option<&[String]>,
        patterns: Option<&[String]>,
        globs: &[String],
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let dirs = match dirs {
            Some(d) => d.to_vec(),
            None => defaults.dirs,
        };
        let patterns = match patterns {
            Some(p) => compile_patterns(p),
            None => defaults.patterns,
        };

        let mut builder = GlobSetBuilder::new();
        for pattern in globs {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let globs = builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: globs.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            dirs,
            patterns,
            globs,
        })
    }

    /// Check a single directory name (used to prune the walk early).
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d == name)
    }

    /// Check a file path relative to the scan root.
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        let in_excluded_dir = rel_path.components().any(|c| match c {
            Component::Normal(part) => self.is_excluded_dir(&part.to_string_lossy()),
            _ => false,
        });
        if in_excluded_dir {
            return true;
        }

        let path_str = display_path(rel_path);
        if self.patterns.iter().any(|re| re.is_match(&path_str)) {
            return true;
        }

        self.globs.is_match(rel_path)
    }
}

fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p.as_ref()) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("ignoring invalid exclude pattern {:?}: {}", p.as_ref(), e);
                None
            }
        })
        .collect()
}

/// Render a relative path with `/` separators on every platform.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
