//! Command-line interface for linegauge.

use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;

use crate::config::Settings;
use crate::report;
use crate::scan::Scanner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Python code health checker - find oversized files and functions.
///
/// Counts effective lines (not blank, not a full-line comment, not part of a
/// docstring) per file and per function, and reports everything above the
/// configured thresholds.
#[derive(Parser, Debug)]
#[command(name = "linegauge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root to scan (directory or single file)
    pub root: PathBuf,

    /// Maximum effective lines per file
    #[arg(long, allow_negative_numbers = true)]
    pub file_threshold: Option<i64>,

    /// Maximum effective lines per function or method
    #[arg(long, allow_negative_numbers = true)]
    pub function_threshold: Option<i64>,

    /// Directory name to exclude (repeatable, replaces the defaults)
    #[arg(long = "exclude-dir", value_name = "DIR")]
    pub exclude_dirs: Vec<String>,

    /// Regex matched against relative paths (repeatable, replaces the defaults)
    #[arg(long = "exclude-pattern", value_name = "REGEX")]
    pub exclude_patterns: Vec<String>,

    /// Glob matched against relative paths (repeatable, added to the config)
    #[arg(long = "exclude-path", value_name = "GLOB")]
    pub excluded_paths: Vec<String>,

    /// Path to a JSON or YAML config file (default: auto-discover in root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not print the console report
    #[arg(long)]
    pub no_console: bool,

    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Write an HTML report to this file
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Settings given on the command line. Unset flags stay `None`.
    pub fn overrides(&self) -> Settings {
        Settings {
            file_threshold: self.file_threshold,
            function_threshold: self.function_threshold,
            exclude_dirs: non_empty(&self.exclude_dirs),
            exclude_patterns: non_empty(&self.exclude_patterns),
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

/// Load the config file layer, explicit or discovered.
fn load_settings(args: &Cli) -> anyhow::Result<Settings> {
    let path = match &args.config {
        Some(p) => Some(p.clone()),
        None => {
            let dir = if args.root.is_dir() {
                args.root.clone()
            } else {
                args.root
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default()
            };
            Settings::discover(&dir)
        }
    };

    match path {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            Ok(Settings::parse_file(&path)?)
        }
        None => Ok(Settings::default()),
    }
}

/// Run a scan and emit the requested reports.
pub fn run(args: &Cli) -> anyhow::Result<i32> {
    // Resolve path
    let root = match args.root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.root, e);
            return Ok(EXIT_ERROR);
        }
    };

    // Layer settings: defaults < config file < command line
    let settings = match load_settings(args) {
        Ok(s) => s.merge(args.overrides()),
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let config = match settings.analysis_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let rules = match settings.exclusion_rules() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    eprintln!("Scanning project: {}", args.root.display());
    eprintln!("  File threshold: {} lines", config.file_threshold);
    eprintln!("  Function threshold: {} lines", config.function_threshold);
    eprintln!();

    let scanner = Scanner::new(&root, config)
        .exclusions(rules)
        .show_progress(!args.no_progress);

    let result = match scanner.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Output results
    if !args.no_console {
        let stdout = io::stdout();
        report::write_console(&mut stdout.lock(), &result)?;
    }
    if let Some(path) = &args.json {
        report::write_json(path, &result)?;
    }
    if let Some(path) = &args.html {
        report::write_html(path, &result)?;
    }

    // Return appropriate exit code
    if result.has_issues() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "linegauge",
            "src",
            "--function-threshold",
            "30",
            "--exclude-dir",
            "vendor",
            "--exclude-dir",
            "gen",
            "--json",
            "out.json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.root, PathBuf::from("src"));
        assert_eq!(cli.file_threshold, None);
        assert_eq!(cli.function_threshold, Some(30));
        assert_eq!(cli.exclude_dirs, vec!["vendor", "gen"]);
        assert_eq!(cli.json, Some(PathBuf::from("out.json")));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.no_console);
    }

    #[test]
    fn test_overrides_leave_unset_fields_empty() {
        let cli = Cli::try_parse_from(["linegauge", "."]).unwrap();
        assert_eq!(cli.overrides(), Settings::default());

        let cli = Cli::try_parse_from(["linegauge", ".", "--file-threshold", "-5"]).unwrap();
        assert_eq!(cli.overrides().file_threshold, Some(-5));
        assert!(cli.overrides().analysis_config().is_err());
    }

    #[test]
    fn test_missing_root_argument() {
        assert!(Cli::try_parse_from(["linegauge"]).is_err());
    }
}
