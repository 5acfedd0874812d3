//! Output formatting for linegauge results.
//!
//! Supports three output formats:
//! - Console: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - HTML: a self-contained page for sharing or CI artifacts

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::{FileAnalysisResult, FunctionSpan};
use crate::scan::{ScanReport, SkippedFile, Summary};

const RULE_WIDTH: usize = 80;
const TITLE: &str = "Python Code Health Check Report";
const NO_ISSUES: &str = "No code quality issues found!";

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub summary: Summary,
    pub issues: Vec<JsonIssue>,
    #[serde(default)]
    pub skipped: Vec<JsonSkipped>,
}

/// One file over a threshold.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonIssue {
    pub file_path: String,
    pub total_lines: usize,
    pub effective_lines: usize,
    pub functions: Vec<JsonFunction>,
}

/// One oversized function or method.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFunction {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub effective_lines: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// A file left out of the analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSkipped {
    pub file_path: String,
    pub reason: String,
}

/// Build the JSON document for a report.
pub fn build_json(report: &ScanReport) -> JsonReport {
    JsonReport {
        summary: report.summary(),
        issues: report.issues.iter().map(issue_to_json).collect(),
        skipped: report
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                file_path: s.file_path.clone(),
                reason: s.reason.to_string(),
            })
            .collect(),
    }
}

fn issue_to_json(issue: &FileAnalysisResult) -> JsonIssue {
    JsonIssue {
        file_path: issue.file_path.clone(),
        total_lines: issue.total_lines,
        effective_lines: issue.effective_lines,
        functions: issue.functions.iter().map(function_to_json).collect(),
    }
}

fn function_to_json(f: &FunctionSpan) -> JsonFunction {
    JsonFunction {
        name: f.name.clone(),
        start_line: f.start_line,
        end_line: f.end_line,
        effective_lines: f.effective_lines,
        kind: f.kind.as_str().to_string(),
        class_name: f.class_name.clone(),
    }
}

/// Write results in JSON format to `path`.
pub fn write_json(path: &Path, report: &ScanReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_json(report))?;
    std::fs::write(path, json + "\n")?;
    println!("JSON report generated: {}", path.display());
    Ok(())
}

// =============================================================================
// HTML Format
// =============================================================================

const HTML_STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 20px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 8px; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 4px; }
        .summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin: 20px 0; }
        .summary-card { background: #f9f9f9; padding: 15px; border-left: 4px solid #667eea; border-radius: 4px; }
        .summary-card h3 { margin: 0 0 10px 0; color: #666; font-size: 12px; }
        .summary-card .value { font-size: 24px; font-weight: bold; color: #667eea; }
        .file-section { margin: 20px 0; border: 1px solid #ddd; border-radius: 4px; }
        .file-header { background: #f9f9f9; padding: 15px; cursor: pointer; display: flex; justify-content: space-between; }
        .file-header:hover { background: #f0f0f0; }
        .file-details { padding: 15px; display: none; }
        .file-details.show { display: block; }
        table { width: 100%; border-collapse: collapse; margin-top: 10px; }
        th, td { padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background: #f9f9f9; font-weight: bold; }
        .warning { color: #dc3545; font-weight: bold; }
        .skipped { color: #856404; }
        .no-issues { text-align: center; padding: 40px; color: #666; }"#;

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a complete HTML page for a report.
pub fn render_html(report: &ScanReport) -> String {
    let summary = report.summary();
    let mut html = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "    <meta charset=\"UTF-8\">");
    let _ = writeln!(
        html,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    );
    let _ = writeln!(html, "    <title>Python Code Health Report</title>");
    let _ = writeln!(html, "    <style>\n{}\n    </style>", HTML_STYLE);
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "    <div class=\"container\">");
    let _ = writeln!(html, "        <div class=\"header\">");
    let _ = writeln!(html, "            <h1>{}</h1>", TITLE);
    let _ = writeln!(html, "            <p>Automated code quality analysis</p>");
    let _ = writeln!(html, "        </div>");

    html_summary(&mut html, &summary);

    let _ = writeln!(html, "        <div class=\"content\">");
    if report.issues.is_empty() {
        let _ = writeln!(html, "            <div class=\"no-issues\">{}</div>", NO_ISSUES);
    } else {
        for issue in &report.issues {
            html_issue(&mut html, issue, report.config.file_threshold);
        }
    }
    if !report.skipped.is_empty() {
        html_skipped(&mut html, &report.skipped);
    }
    let _ = writeln!(html, "        </div>");

    let _ = writeln!(html, "    </div>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}

fn html_summary(html: &mut String, summary: &Summary) {
    let cards = [
        ("Total Issues", summary.total_issues),
        ("Files Exceeding", summary.files_exceeding_threshold),
        ("Functions Exceeding", summary.functions_exceeding_threshold),
        ("File Threshold", summary.file_threshold),
        ("Function Threshold", summary.function_threshold),
        ("Files Scanned", summary.files_scanned),
        ("Files Skipped", summary.files_skipped),
    ];

    let _ = writeln!(html, "        <div class=\"summary\">");
    for (label, value) in cards {
        let _ = writeln!(
            html,
            "            <div class=\"summary-card\"><h3>{}</h3><div class=\"value\">{}</div></div>",
            label, value
        );
    }
    let _ = writeln!(html, "        </div>");
}

fn html_issue(html: &mut String, issue: &FileAnalysisResult, file_threshold: usize) {
    let _ = writeln!(html, "            <div class=\"file-section\">");
    let _ = writeln!(
        html,
        "                <div class=\"file-header\" onclick=\"this.nextElementSibling.classList.toggle('show')\">"
    );
    let _ = writeln!(
        html,
        "                    <span><strong>{}</strong> ({}/{} lines)</span>",
        escape_html(&issue.file_path),
        issue.effective_lines,
        issue.total_lines
    );
    let _ = writeln!(html, "                    <span>&#9660;</span>");
    let _ = writeln!(html, "                </div>");
    let _ = writeln!(html, "                <div class=\"file-details show\">");

    if issue.effective_lines > file_threshold {
        let _ = writeln!(
            html,
            "                    <p><span class=\"warning\">File exceeds threshold: {} &gt; {}</span></p>",
            issue.effective_lines, file_threshold
        );
    }

    if !issue.functions.is_empty() {
        let _ = writeln!(html, "                    <table>");
        let _ = writeln!(
            html,
            "                        <thead><tr><th>Function</th><th>Type</th><th>Lines</th><th>Effective Lines</th></tr></thead>"
        );
        let _ = writeln!(html, "                        <tbody>");
        for f in &issue.functions {
            let _ = writeln!(
                html,
                "                            <tr><td>{}</td><td>{}</td><td>{}-{}</td><td><span class=\"warning\">{}</span></td></tr>",
                escape_html(&f.qualified_name()),
                f.kind,
                f.start_line,
                f.end_line,
                f.effective_lines
            );
        }
        let _ = writeln!(html, "                        </tbody>");
        let _ = writeln!(html, "                    </table>");
    }

    let _ = writeln!(html, "                </div>");
    let _ = writeln!(html, "            </div>");
}

fn html_skipped(html: &mut String, skipped: &[SkippedFile]) {
    let _ = writeln!(html, "            <div class=\"file-section\">");
    let _ = writeln!(
        html,
        "                <div class=\"file-header\"><span><strong>Skipped files</strong> ({})</span></div>",
        skipped.len()
    );
    let _ = writeln!(html, "                <div class=\"file-details show\">");
    let _ = writeln!(html, "                    <table>");
    let _ = writeln!(
        html,
        "                        <thead><tr><th>File</th><th>Reason</th></tr></thead>"
    );
    let _ = writeln!(html, "                        <tbody>");
    for s in skipped {
        let _ = writeln!(
            html,
            "                            <tr><td>{}</td><td class=\"skipped\">{}</td></tr>",
            escape_html(&s.file_path),
            escape_html(&s.reason.to_string())
        );
    }
    let _ = writeln!(html, "                        </tbody>");
    let _ = writeln!(html, "                    </table>");
    let _ = writeln!(html, "                </div>");
    let _ = writeln!(html, "            </div>");
}

/// Write results in HTML format to `path`.
pub fn write_html(path: &Path, report: &ScanReport) -> anyhow::Result<()> {
    std::fs::write(path, render_html(report))?;
    println!("HTML report generated: {}", path.display());
    Ok(())
}

// =============================================================================
// Console Format
// =============================================================================

/// Write results in console (human-readable) format.
pub fn write_console<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let summary = report.summary();
    let rule = "=".repeat(RULE_WIDTH);

    // Header
    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", format!("{:^width$}", TITLE, width = RULE_WIDTH).bold())?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;

    write_summary(out, &summary)?;

    if report.issues.is_empty() {
        writeln!(out, "{}", NO_ISSUES.green())?;
        writeln!(out)?;
    } else {
        write_issues(out, report)?;
    }

    if !report.skipped.is_empty() {
        write_skipped(out, &report.skipped)?;
    }

    writeln!(out, "{}", rule)?;
    writeln!(out)?;
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out, "{}", "Summary".bold())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "  Total issues: {}", summary.total_issues)?;
    writeln!(
        out,
        "  Files exceeding threshold: {}",
        summary.files_exceeding_threshold
    )?;
    writeln!(
        out,
        "  Functions exceeding threshold: {}",
        summary.functions_exceeding_threshold
    )?;
    writeln!(out, "  File threshold: {} lines", summary.file_threshold)?;
    writeln!(out, "  Function threshold: {} lines", summary.function_threshold)?;
    writeln!(out, "  Files scanned: {}", summary.files_scanned)?;
    if summary.files_skipped > 0 {
        writeln!(
            out,
            "  Files skipped: {}",
            summary.files_skipped.to_string().yellow()
        )?;
    } else {
        writeln!(out, "  Files skipped: 0")?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_issues<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let threshold = report.config.file_threshold;

    writeln!(out, "{}", "Issues Details".bold())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for (idx, issue) in report.issues.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "{}. {}", idx + 1, issue.file_path.blue())?;
        writeln!(
            out,
            "   Total lines: {}, Effective lines: {}",
            issue.total_lines, issue.effective_lines
        )?;

        if issue.effective_lines > threshold {
            writeln!(
                out,
                "   {} File exceeds threshold: {} > {}",
                "WARNING:".red(),
                issue.effective_lines,
                threshold
            )?;
        }

        if !issue.functions.is_empty() {
            writeln!(out, "   Functions exceeding threshold:")?;
            for f in &issue.functions {
                writeln!(out, "     - {} ({})", f.qualified_name(), f.kind.to_string().dimmed())?;
                writeln!(
                    out,
                    "       Lines: {}-{}, Effective: {}",
                    f.start_line,
                    f.end_line,
                    f.effective_lines.to_string().yellow()
                )?;
            }
        }
    }

    writeln!(out)?;
    Ok(())
}

fn write_skipped<W: Write>(out: &mut W, skipped: &[SkippedFile]) -> io::Result<()> {
    writeln!(out, "{} ({}):", "Skipped files".yellow().bold(), skipped.len())?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for s in skipped {
        writeln!(out, "  {}  {}", s.file_path, s.reason.to_string().dimmed())?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FunctionKind, SkipReason};
    use crate::config::AnalysisConfig;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::new(AnalysisConfig {
            file_threshold: 100,
            function_threshold: 10,
        });
        report.files_scanned = 3;
        report.issues.push(FileAnalysisResult {
            file_path: "pkg/<big>.py".to_string(),
            total_lines: 180,
            effective_lines: 150,
            functions: vec![FunctionSpan {
                name: "handle".to_string(),
                kind: FunctionKind::Method,
                class_name: Some("Server".to_string()),
                start_line: 12,
                end_line: 40,
                effective_lines: 25,
            }],
        });
        report.skipped.push(SkippedFile {
            file_path: "broken.py".to_string(),
            reason: SkipReason::SyntaxError { line: 3, column: 7 },
        });
        report
    }

    fn console_output(report: &ScanReport) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_console(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_console_no_issues() {
        let report = ScanReport::new(AnalysisConfig::default());
        let text = console_output(&report);
        assert!(text.contains(NO_ISSUES));
        assert!(text.contains("Total issues: 0"));
        assert!(!text.contains("Skipped files"));
    }

    #[test]
    fn test_console_issues_and_skips() {
        let text = console_output(&sample_report());
        assert!(text.contains("1. pkg/<big>.py"));
        assert!(text.contains("Total lines: 180, Effective lines: 150"));
        assert!(text.contains("WARNING: File exceeds threshold: 150 > 100"));
        assert!(text.contains("- Server.handle (method)"));
        assert!(text.contains("Lines: 12-40, Effective: 25"));
        assert!(text.contains("broken.py  syntax error at line 3, column 7"));
        assert!(!text.contains(NO_ISSUES));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(build_json(&sample_report())).unwrap();

        assert_eq!(value["summary"]["total_issues"], 1);
        assert_eq!(value["summary"]["files_exceeding_threshold"], 1);
        assert_eq!(value["summary"]["functions_exceeding_threshold"], 1);
        assert_eq!(value["summary"]["files_skipped"], 1);

        let func = &value["issues"][0]["functions"][0];
        assert_eq!(func["name"], "handle");
        assert_eq!(func["type"], "method");
        assert_eq!(func["class_name"], "Server");
        assert_eq!(func["start_line"], 12);

        assert_eq!(value["skipped"][0]["file_path"], "broken.py");
        assert_eq!(
            value["skipped"][0]["reason"],
            "syntax error at line 3, column 7"
        );
    }

    #[test]
    fn test_json_omits_missing_class_name() {
        let f = function_to_json(&FunctionSpan {
            name: "main".to_string(),
            kind: FunctionKind::Function,
            class_name: None,
            start_line: 1,
            end_line: 60,
            effective_lines: 55,
        });
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"type\":\"function\""));
        assert!(!json.contains("class_name"));
    }

    #[test]
    fn test_html_escapes_and_sections() {
        let html = render_html(&sample_report());
        assert!(html.contains("pkg/&lt;big&gt;.py"));
        assert!(!html.contains("pkg/<big>.py"));
        assert!(html.contains("<td>Server.handle</td><td>method</td><td>12-40</td>"));
        assert!(html.contains("File exceeds threshold: 150 &gt; 100"));
        assert!(html.contains("Skipped files"));
        assert!(!html.contains(NO_ISSUES));
    }

    #[test]
    fn test_html_placeholder_when_clean() {
        let html = render_html(&ScanReport::new(AnalysisConfig::default()));
        assert!(html.contains(NO_ISSUES));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }
}
