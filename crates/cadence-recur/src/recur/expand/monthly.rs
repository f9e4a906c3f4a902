//! Monthly advancement by day of month.

use std::cmp::Ordering;

use crate::error::RecurResult;
use crate::recur::cursor::{CalendarCursor, CalendarUnit};
use crate::recur::rule::{MonthDay, RecurrenceRule};

use super::normalize::pin_lower_fields;

/// ## Summary
/// Returns the first occurrence of `day` strictly after `from`.
///
/// ## Errors
/// Propagates cursor arithmetic and resolution errors.
pub(crate) fn next_month_day(
    rule: &RecurrenceRule,
    from: &CalendarCursor,
    day: MonthDay,
) -> RecurResult<CalendarCursor> {
    // `from` with the rule's time of day; the reference for every branch.
    let target = pin_lower_fields(rule, *from, from)?;

    match day {
        MonthDay::Last => next_last_day(rule, from, target),
        MonthDay::Day(day) => next_fixed_day(rule, from, target, u32::from(day)),
    }
}

fn next_last_day(
    rule: &RecurrenceRule,
    from: &CalendarCursor,
    target: CalendarCursor,
) -> RecurResult<CalendarCursor> {
    if from.is_last_day_of_month() && *from < target {
        return Ok(target);
    }

    let this_month = target.with_last_day()?;
    let candidate = if this_month > *from {
        this_month
    } else {
        target.add(CalendarUnit::Month, 1)?.with_last_day()?
    };

    pin_lower_fields(rule, candidate, &target)
}

fn next_fixed_day(
    rule: &RecurrenceRule,
    from: &CalendarCursor,
    target: CalendarCursor,
    day: u32,
) -> RecurResult<CalendarCursor> {
    let candidate = match from.day().cmp(&day) {
        Ordering::Less => target.with_day(day)?,
        Ordering::Equal if *from < target => target,
        Ordering::Equal | Ordering::Greater => {
            target.add(CalendarUnit::Month, 1)?.with_day(day)?
        }
    };

    pin_lower_fields(rule, candidate, &target)
}
