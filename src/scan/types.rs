//! Aggregated scan results.

use serde::{Deserialize, Serialize};

use crate::analysis::{FileAnalysisResult, SkipReason};
use crate::config::AnalysisConfig;

/// A file left out of analysis, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_path: String,
    pub reason: SkipReason,
}

/// Result of scanning one project.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Thresholds the scan ran with.
    pub config: AnalysisConfig,
    /// Files over a threshold, in discovery order.
    pub issues: Vec<FileAnalysisResult>,
    /// Files that could not be analyzed, in discovery order.
    pub skipped: Vec<SkippedFile>,
    /// Number of files handed to the analyzer (skipped ones included).
    pub files_scanned: usize,
}

impl ScanReport {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_report(self)
    }
}

/// Counts derived from a scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_issues: usize,
    pub files_exceeding_threshold: usize,
    pub functions_exceeding_threshold: usize,
    pub file_threshold: usize,
    pub function_threshold: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl Summary {
    pub fn from_report(report: &ScanReport) -> Self {
        Self {
            total_issues: report.issues.len(),
            files_exceeding_threshold: report
                .issues
                .iter()
                .filter(|i| i.exceeds_file_threshold(&report.config))
                .count(),
            functions_exceeding_threshold: report.issues.iter().map(|i| i.functions.len()).sum(),
            file_threshold: report.config.file_threshold,
            function_threshold: report.config.function_threshold,
            files_scanned: report.files_scanned,
            files_skipped: report.skipped.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FunctionKind, FunctionSpan};

    fn span(name: &str, effective_lines: usize) -> FunctionSpan {
        FunctionSpan {
            name: name.to_string(),
            kind: FunctionKind::Function,
            class_name: None,
            start_line: 1,
            end_line: effective_lines,
            effective_lines,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut report = ScanReport::new(AnalysisConfig {
            file_threshold: 100,
            function_threshold: 10,
        });
        report.files_scanned = 5;
        report.issues.push(FileAnalysisResult {
            file_path: "big.py".to_string(),
            total_lines: 300,
            effective_lines: 250,
            functions: vec![],
        });
        report.issues.push(FileAnalysisResult {
            file_path: "small.py".to_string(),
            total_lines: 60,
            effective_lines: 40,
            functions: vec![span("a", 20), span("b", 15)],
        });
        report.skipped.push(SkippedFile {
            file_path: "bad.py".to_string(),
            reason: SkipReason::SyntaxError { line: 1, column: 1 },
        });

        let summary = report.summary();
        assert_eq!(summary.total_issues, 2);
        assert_eq!(summary.files_exceeding_threshold, 1);
        assert_eq!(summary.functions_exceeding_threshold, 2);
        assert_eq!(summary.files_scanned, 5);
        assert_eq!(summary.files_skipped, 1);
        assert!(report.has_issues());
    }
}
