use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cadence_recur::RuleSpec;
use chrono::{DateTime, FixedOffset};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "cadence")]
#[command(about = "Expand a recurrence rule into its next occurrences")]
pub struct Args {
    /// Path to a JSON rule, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub rule: PathBuf,

    /// Expand after this RFC 3339 timestamp instead of now
    #[arg(short, long, value_parser = parse_start)]
    pub start: Option<DateTime<FixedOffset>>,

    /// Occurrences to produce when the rule has no count
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Print a JSON array instead of one timestamp per line
    #[arg(long)]
    pub json: bool,
}

fn parse_start(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
}

/// ## Summary
/// Reads a rule from `path`, or from stdin when `path` is `-`.
///
/// ## Errors
/// Returns an error if the source cannot be read or is not a valid rule document.
pub fn read_rule(path: &Path) -> Result<RuleSpec> {
    let source = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read rule from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule file {}", path.display()))?
    };

    parse_rule(&source)
}

/// ## Summary
/// Parses a JSON rule document.
///
/// ## Errors
/// Returns an error if the document is not a valid rule.
pub fn parse_rule(source: &str) -> Result<RuleSpec> {
    serde_json::from_str(source).context("Invalid rule document")
}
