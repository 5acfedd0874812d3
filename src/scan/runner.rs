//! Project scanner that discovers and analyzes Python files.

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::{self, FileAnalysisResult, SkipReason};
use crate::config::{AnalysisConfig, ConfigError};

use super::exclude::{display_path, ExclusionRules};
use super::{ScanReport, SkippedFile};

/// Extension of the files a scan picks up.
const PYTHON_EXTENSION: &str = "py";

/// Per-file outcome, kept in discovery order until aggregation.
enum Outcome {
    Healthy,
    Issue(FileAnalysisResult),
    Skipped(SkipReason),
}

/// Walks a project and runs the analyzer over every candidate file.
pub struct Scanner {
    root: PathBuf,
    config: AnalysisConfig,
    rules: ExclusionRules,
    show_progress: bool,
}

impl Scanner {
    /// Create a scanner with default exclusion rules.
    pub fn new<P: AsRef<Path>>(root: P, config: AnalysisConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
            rules: ExclusionRules::default(),
            show_progress: false,
        }
    }

    /// Set the exclusion rules.
    pub fn exclusions(mut self, rules: ExclusionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set whether to draw a progress bar on stderr.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Collect candidate files in a deterministic order.
    ///
    /// A root that is itself a file yields just that file.
    pub fn discover(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let metadata =
            std::fs::metadata(&self.root).map_err(|source| ConfigError::InaccessibleRoot {
                path: self.root.clone(),
                source,
            })?;

        if metadata.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !self.rules.is_excluded_dir(&e.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // Symlinked files are scanned; symlinked directories are not walked.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PYTHON_EXTENSION) {
                continue;
            }

            if self.rules.is_excluded(self.relative(path)) {
                log::debug!("excluded {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Discover and analyze every file under the root.
    pub fn run(&self) -> Result<ScanReport, ConfigError> {
        let files = self.discover()?;
        log::info!("analyzing {} file(s) under {}", files.len(), self.root.display());
        Ok(self.analyze_files(&files))
    }

    /// Analyze the given files in parallel. The report keeps the input order.
    pub fn analyze_files(&self, files: &[PathBuf]) -> ScanReport {
        let progress = self.progress_bar(files.len() as u64);

        let outcomes: Vec<(String, Outcome)> = files
            .par_iter()
            .progress_with(progress.clone())
            .map(|path| {
                let rel = self.report_path(path);
                let outcome = self.analyze_file(path, &rel);
                (rel, outcome)
            })
            .collect();

        progress.finish_and_clear();

        let mut report = ScanReport::new(self.config);
        report.files_scanned = outcomes.len();

        for (file_path, outcome) in outcomes {
            match outcome {
                Outcome::Healthy => {}
                Outcome::Issue(issue) => report.issues.push(issue),
                Outcome::Skipped(reason) => {
                    log::warn!("skipped {}: {}", file_path, reason);
                    report.skipped.push(SkippedFile { file_path, reason });
                }
            }
        }

        report
    }

    fn analyze_file(&self, path: &Path, rel: &str) -> Outcome {
        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(e) => return Outcome::Skipped(SkipReason::Unreadable(e.to_string())),
        };

        match analysis::analyze(rel, &raw, &self.config) {
            Ok(Some(issue)) => Outcome::Issue(issue),
            Ok(None) => Outcome::Healthy,
            Err(reason) => Outcome::Skipped(reason),
        }
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Path as shown in reports. A single-file scan reports the file name.
    fn report_path(&self, path: &Path) -> String {
        let rel = self.relative(path);
        if rel.as_os_str().is_empty() {
            return path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| display_path(path));
        }
        display_path(rel)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} files")
        {
            bar.set_style(style);
        }
        bar
    }
}
