//! Project scanning: file discovery, exclusion, parallel analysis and
//! aggregation.

mod exclude;
mod runner;
mod types;

pub use exclude::{display_path, ExclusionRules, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXCLUDE_PATTERNS};
pub use runner::Scanner;
pub use types::{ScanReport, SkippedFile, Summary};
