//! Effective line analysis for Python sources.
//!
//! This module is the analysis core. It is stateless per file:
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌────────────────┐   ┌───────────────────┐
//! │ Raw bytes   │──▶│ SourceUnit   │──▶│ Docstrings     │──▶│ Line classifier   │
//! └─────────────┘   │ (decode,     │   │ (first-stmt    │   │ (blank, comment,  │
//!                   │  tree-sitter)│   │  string spans) │   │  docstring, code) │
//!                   └──────────────┘   └────────────────┘   └───────────────────┘
//!                                                                     │
//!                                                                     ▼
//!                                      ┌────────────────┐   ┌───────────────────┐
//!                                      │ FileAnalysis-  │◀──│ Function spans    │
//!                                      │ Result / None  │   │ (pre-order walk)  │
//!                                      └────────────────┘   └───────────────────┘
//! ```
//!
//! Effective lines are physical lines that are neither blank, a full-line
//! comment, nor part of a docstring.

pub mod docstrings;
mod file;
pub mod functions;
pub mod lines;
pub mod source;

use thiserror::Error;

pub use file::{analyze, measure, FileAnalysisResult, FileMetrics};
pub use functions::{FunctionKind, FunctionSpan};
pub use lines::{classify, count_effective, DocstringRanges, LineKind, LineSpan};
pub use source::SourceUnit;

/// Why a file was left out of analysis.
///
/// Skipped files are reported separately from healthy files and from issues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("syntax error at line {line}, column {column}")]
    SyntaxError { line: usize, column: usize },
    #[error("parser unavailable: {0}")]
    Parser(String),
    #[error("unreadable file: {0}")]
    Unreadable(String),
}

impl SkipReason {
    /// Short machine-readable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::SyntaxError { .. } => "syntax_error",
            SkipReason::Parser(_) => "parser_error",
            SkipReason::Unreadable(_) => "unreadable",
        }
    }
}
