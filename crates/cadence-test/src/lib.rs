//! Cadence - integration test support.
//!
//! Re-exports the workspace crates and a few helpers shared by the
//! integration suites.

pub use cadence_app as app;
pub use cadence_core::config;
pub use cadence_recur as recur;

use cadence_recur::error::RecurResult;
use cadence_recur::{Occurrences, RecurrenceRule, RuleSpec};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// ## Summary
/// Parses an RFC 3339 timestamp into UTC.
///
/// ## Panics
/// Panics if `value` is not valid RFC 3339; test fixtures are static.
#[must_use]
#[expect(clippy::expect_used, reason = "fixture helper")]
pub fn utc(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("fixture timestamp must be RFC 3339")
        .with_timezone(&Utc)
}

/// ## Summary
/// Parses a JSON rule document into a validated rule.
///
/// ## Errors
/// Returns the construction error for invalid rules.
///
/// ## Panics
/// Panics if `json` is not a well-formed rule document.
#[expect(clippy::expect_used, reason = "fixture helper")]
pub fn rule(json: &str) -> RecurResult<RecurrenceRule> {
    let spec: RuleSpec = serde_json::from_str(json).expect("fixture rule must be valid JSON");
    RecurrenceRule::try_from(spec)
}

/// Renders an occurrence the way fixtures spell them.
#[must_use]
pub fn render(at: &DateTime<Tz>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// ## Summary
/// Expands `rule` from `start` and collects every occurrence.
///
/// ## Errors
/// Returns the first advancement error.
pub fn collect(
    rule: RecurrenceRule,
    start: &str,
    count: Option<u32>,
) -> RecurResult<Vec<DateTime<Tz>>> {
    Occurrences::new(rule, Some(utc(start)), count).collect()
}
