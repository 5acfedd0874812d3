//! linegauge - Python code health checker.
//!
//! linegauge walks a Python project and measures effective lines of code:
//! physical lines that are not blank, not a full-line comment, and not part
//! of a docstring. Files and functions above configurable thresholds are
//! reported on the console, as JSON, or as HTML.
//!
//! # Architecture
//!
//! - `analysis`: Per-file core (decode, tree-sitter parse, docstrings,
//!   line classification, function spans)
//! - `scan`: File discovery, exclusion rules, parallel analysis
//! - `config`: Thresholds and settings from defaults, config files and flags
//! - `report`: Output formatting (console, JSON, HTML)
//! - `cli`: Command-line entry point

pub mod analysis;
pub mod cli;
pub mod config;
pub mod report;
pub mod scan;

pub use analysis::{
    analyze, measure, FileAnalysisResult, FunctionKind, FunctionSpan, LineKind, SkipReason,
};
pub use config::{AnalysisConfig, ConfigError, Settings};
pub use scan::{ScanReport, Scanner, SkippedFile, Summary};
