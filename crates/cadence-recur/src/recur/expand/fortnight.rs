//! Fortnightly advancement phase-locked to `dtStart`.

use crate::error::RecurResult;
use crate::recur::cursor::{CalendarCursor, CalendarUnit};
use crate::recur::rule::RecurrenceRule;

use super::normalize::pin_lower_fields;

/// ## Summary
/// Returns the next on-cadence occurrence after `from`.
///
/// With a `dtStart`, the anchor is the latest date `dtStart + 14k` days at or
/// before `from`'s local date (floor division, so `k` may be negative when
/// `from` precedes `dtStart`). The anchor pinned to the rule's time of day is
/// returned if it is still after `from`; otherwise the anchor plus one
/// fortnight is. Without a `dtStart`, `from` itself is the anchor and the
/// result is always one fortnight later.
///
/// ## Errors
/// Propagates cursor arithmetic and resolution errors.
pub(crate) fn next_fortnight(
    rule: &RecurrenceRule,
    from: &CalendarCursor,
) -> RecurResult<CalendarCursor> {
    let reference = pin_lower_fields(rule, *from, from)?;

    let anchor = match rule.dt_start() {
        Some(start) => {
            let days = reference
                .date_naive()
                .signed_duration_since(start.date_naive())
                .num_days();
            let anchor = start.add(CalendarUnit::Fortnight, days.div_euclid(14))?;

            // The seed can sit on a cadence day before that day's occurrence.
            let same_day = pin_lower_fields(rule, anchor, &reference)?;
            if same_day > *from {
                return Ok(same_day);
            }
            anchor
        }
        None => *from,
    };

    let next = anchor.add(CalendarUnit::Fortnight, 1)?;
    pin_lower_fields(rule, next, &reference)
}
