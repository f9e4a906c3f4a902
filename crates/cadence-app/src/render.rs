use anyhow::Result;
use cadence_core::config::Settings;
use cadence_recur::{Occurrences, RecurrenceRule, RuleSpec, TimeZoneResolver};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// ## Summary
/// Expands `spec` into RFC 3339 timestamps.
///
/// A missing `tzId` takes the configured default, and the configured
/// default count caps rules that carry no count of their own when the
/// caller passes none.
///
/// ## Errors
/// Returns an error if the rule is invalid or an occurrence cannot be computed.
pub fn expand(
    mut spec: RuleSpec,
    settings: &Settings,
    start: Option<DateTime<FixedOffset>>,
    count: Option<u32>,
) -> Result<Vec<String>> {
    spec.tz_id
        .get_or_insert_with(|| settings.recurrence.default_tz_id.clone());

    let mut resolver = TimeZoneResolver::new();
    let rule: RecurrenceRule = spec.into_rule(&mut resolver)?;
    let cap = count.unwrap_or(settings.recurrence.default_count);

    tracing::info!(rule = %rule, cap, "Expanding rule");

    Occurrences::new(rule, start.map(|s| s.with_timezone(&Utc)), Some(cap))
        .map(|occurrence| {
            occurrence
                .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, false))
                .map_err(anyhow::Error::from)
        })
        .collect()
}

/// Formats expanded occurrences for stdout.
///
/// ## Errors
/// Returns an error if JSON serialization fails.
pub fn render(occurrences: &[String], json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(occurrences)?)
    } else {
        Ok(occurrences.join("\n"))
    }
}
