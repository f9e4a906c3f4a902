//! Lower-order field pinning.

use crate::error::RecurResult;
use crate::recur::cursor::CalendarCursor;
use crate::recur::rule::{Frequency, RecurrenceRule};

/// ## Summary
/// Pins every field finer than the rule's own unit.
///
/// Seconds are pinned below `MINUTELY`, minutes below `HOURLY` and hours
/// below `DAILY`. Each takes the rule's `by*` value when present, otherwise
/// the matching field of `reference`.
///
/// ## Errors
/// Propagates cursor resolution errors.
pub(crate) fn pin_lower_fields(
    rule: &RecurrenceRule,
    target: CalendarCursor,
    reference: &CalendarCursor,
) -> RecurResult<CalendarCursor> {
    let frequency = rule.frequency();
    let mut pinned = target;

    if frequency > Frequency::Secondly {
        pinned = pinned.with_second(rule.second().unwrap_or_else(|| reference.second()))?;
    }
    if frequency > Frequency::Minutely {
        pinned = pinned.with_minute(rule.minute().unwrap_or_else(|| reference.minute()))?;
    }
    if frequency > Frequency::Hourly {
        pinned = pinned.with_hour(rule.hour().unwrap_or_else(|| reference.hour()))?;
    }

    Ok(pinned)
}
