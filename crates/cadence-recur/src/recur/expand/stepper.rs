//! Generic "snap, check, else step" advancement.
//!
//! Shared by every frequency whose next occurrence is one whole unit away:
//! secondly through daily, weekly (other than fortnightly) and yearly.

use crate::error::RecurResult;
use crate::recur::cursor::{CalendarCursor, CalendarUnit};
use crate::recur::rule::RecurrenceRule;

use super::normalize::pin_lower_fields;

/// ## Summary
/// Returns the first occurrence strictly after `from`.
///
/// The cursor is first snapped onto the rule's lower fields (and, for
/// weekly rules, onto `weekday` within the current week). If that is
/// already in the future it is the answer; otherwise the snapped candidate
/// advances by `interval` units and is pinned again.
///
/// ## Errors
/// Propagates cursor arithmetic and resolution errors.
pub(crate) fn next_stepped(
    rule: &RecurrenceRule,
    from: &CalendarCursor,
    unit: CalendarUnit,
    weekday: Option<chrono::Weekday>,
) -> RecurResult<CalendarCursor> {
    let mut candidate = pin_lower_fields(rule, *from, from)?;
    if let Some(weekday) = weekday {
        candidate = candidate.with_weekday(weekday)?;
    }

    if candidate > *from {
        return Ok(candidate);
    }

    let advanced = candidate.add(unit, i64::from(rule.interval()))?;
    pin_lower_fields(rule, advanced, &candidate)
}
