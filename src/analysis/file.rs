//! Per-file analysis and threshold gating.

use crate::config::AnalysisConfig;

use super::docstrings;
use super::functions::{self, FunctionSpan};
use super::lines::count_effective;
use super::source::{SourceUnit, Syntax};
use super::SkipReason;

/// A file that exceeds the file threshold or holds at least one oversized
/// function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysisResult {
    /// Path as reported (relative to the scan root).
    pub file_path: String,
    /// Physical line count of the whole file.
    pub total_lines: usize,
    /// Effective line count of the whole file.
    pub effective_lines: usize,
    /// Functions exceeding the function threshold, in definition order.
    pub functions: Vec<FunctionSpan>,
}

impl FileAnalysisResult {
    /// Check if the file itself is over the file threshold.
    pub fn exceeds_file_threshold(&self, config: &AnalysisConfig) -> bool {
        self.effective_lines > config.file_threshold
    }
}

/// Line metrics for one successfully parsed file, before threshold gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetrics {
    pub total_lines: usize,
    pub effective_lines: usize,
    /// Every function in the file, oversized or not.
    pub functions: Vec<FunctionSpan>,
}

/// Measure a file without applying any threshold.
pub fn measure(path: &str, raw: &[u8]) -> Result<FileMetrics, SkipReason> {
    let unit = SourceUnit::parse(raw);
    let tree = match unit.syntax() {
        Syntax::Tree(tree) => tree,
        Syntax::Failed(reason) => return Err(reason.clone()),
    };

    let root = tree.root_node();
    let lines = unit.lines();
    let ranges = docstrings::locate(root, unit.source());
    let effective_lines = count_effective(&lines, &ranges, 0, lines.len());
    let functions = functions::extract(root, unit.source(), &lines, &ranges);
    log::trace!(
        "{}: {} line(s), {} docstring(s), {} function(s)",
        path,
        lines.len(),
        ranges.len(),
        functions.len()
    );

    Ok(FileMetrics {
        total_lines: lines.len(),
        effective_lines,
        functions,
    })
}

/// Analyze one file.
///
/// Returns `Ok(None)` for a healthy file and `Err` when the file cannot be
/// parsed. A file under its own threshold is still reported when any of its
/// functions, nested ones included, is over the function threshold.
pub fn analyze(
    path: &str,
    raw: &[u8],
    config: &AnalysisConfig,
) -> Result<Option<FileAnalysisResult>, SkipReason> {
    let metrics = measure(path, raw)?;

    let functions: Vec<FunctionSpan> = metrics
        .functions
        .into_iter()
        .filter(|f| f.exceeds(config.function_threshold))
        .collect();

    if metrics.effective_lines <= config.file_threshold && functions.is_empty() {
        log::trace!("{}: healthy ({} effective lines)", path, metrics.effective_lines);
        return Ok(None);
    }

    log::debug!(
        "{}: {} effective lines, {} oversized function(s)",
        path,
        metrics.effective_lines,
        functions.len()
    );

    Ok(Some(FileAnalysisResult {
        file_path: path.to_string(),
        total_lines: metrics.total_lines,
        effective_lines: metrics.effective_lines,
        functions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FunctionKind;

    fn config(file_threshold: usize, function_threshold: usize) -> AnalysisConfig {
        AnalysisConfig::new(file_threshold as i64, function_threshold as i64).unwrap()
    }

    fn function_with_body(name: &str, body_lines: usize) -> String {
        let mut source = format!("def {}():\n", name);
        for i in 0..body_lines {
            source.push_str(&format!("    x{} = {}\n", i, i));
        }
        source
    }

    #[test]
    fn test_module_docstring_scenario() {
        let source = b"\"\"\"doc\"\"\"\n\n# comment\nx = 1\n\"\"\"not a docstring\"\"\"";
        let metrics = measure("scenario.py", source).unwrap();
        assert_eq!(metrics.total_lines, 5);
        assert_eq!(metrics.effective_lines, 2);
    }

    #[test]
    fn test_healthy_file_returns_none() {
        let source = function_with_body("small", 3);
        let result = analyze("small.py", source.as_bytes(), &config(500, 50)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_function_threshold_is_strict() {
        // def line + 4 body lines = 5 effective lines.
        let source = function_with_body("f", 4);

        let at_threshold = analyze("f.py", source.as_bytes(), &config(500, 5)).unwrap();
        assert!(at_threshold.is_none());

        let over = analyze("f.py", source.as_bytes(), &config(500, 4)).unwrap().unwrap();
        assert_eq!(over.functions.len(), 1);
        assert_eq!(over.functions[0].effective_lines, 5);
    }

    #[test]
    fn test_file_threshold_is_strict() {
        let source = "a = 1\nb = 2\nc = 3\n";
        assert!(analyze("m.py", source.as_bytes(), &config(3, 50)).unwrap().is_none());

        let result = analyze("m.py", source.as_bytes(), &config(2, 50)).unwrap().unwrap();
        assert_eq!(result.effective_lines, 3);
        assert!(result.functions.is_empty());
        assert!(result.exceeds_file_threshold(&config(2, 50)));
    }

    #[test]
    fn test_small_file_with_oversized_nested_function() {
        let mut source = String::from("\"\"\"Module.\"\"\"\n\n");
        source.push_str("def outer():\n");
        source.push_str("    def inner():\n");
        for i in 0..6 {
            source.push_str(&format!("        y{} = {}\n", i, i));
        }
        source.push_str("    return inner\n");
        source.push_str("\n\ndef tiny():\n    return 0\n");

        // outer: 9 effective, inner: 7 effective, tiny: 2.
        let cfg = config(500, 6);
        let result = analyze("nested.py", source.as_bytes(), &cfg)
            .unwrap()
            .expect("oversized nested function should be reported");

        assert!(!result.exceeds_file_threshold(&cfg));
        assert_eq!(result.total_lines, 15);
        assert_eq!(result.effective_lines, 11);
        let names: Vec<_> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
        assert_eq!(result.functions[0].effective_lines, 9);
        assert_eq!(result.functions[1].effective_lines, 7);
        assert!(result.functions.iter().all(|f| f.kind == FunctionKind::Function));
    }

    #[test]
    fn test_syntax_error_is_skipped() {
        let err = analyze("bad.py", b"def (:\n", &config(500, 50)).unwrap_err();
        assert!(matches!(err, SkipReason::SyntaxError { line: 1, .. }));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let source = function_with_body("g", 10);
        let cfg = config(5, 5);
        let first = analyze("g.py", source.as_bytes(), &cfg).unwrap();
        let second = analyze("g.py", source.as_bytes(), &cfg).unwrap();
        assert_eq!(first, second);
    }
}
