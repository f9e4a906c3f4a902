//! Occurrence advancement.
//!
//! Each rule shape maps onto exactly one [`Advance`] strategy. Every
//! strategy has the same contract: given the rule and a cursor, return the
//! next occurrence strictly after that cursor.

mod fortnight;
mod monthly;
mod normalize;
mod stepper;

use chrono::Datelike;

use crate::error::RecurResult;
use crate::recur::cursor::{CalendarCursor, CalendarUnit};
use crate::recur::rule::{Frequency, MonthDay, RecurrenceRule, Weekday};

/// Advancement strategy selected from a rule's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Snap onto the lower fields, else step `interval` whole units.
    Stepped { unit: CalendarUnit },
    /// As `Stepped` by weeks, snapping onto `weekday` first when set.
    Weekly { weekday: Option<Weekday> },
    /// Every two weeks, phase-locked to `dtStart`.
    Fortnightly,
    /// A fixed (or last) day of each month.
    MonthDay(MonthDay),
}

impl Advance {
    /// ## Summary
    /// Picks the strategy for `rule`. First match wins:
    /// monthly, then fortnightly, then weekly, then the generic stepper.
    ///
    /// A monthly rule without `byMonthDay` falls back to `dtStart`'s day of
    /// month, and to plain month steps when there is no `dtStart` either.
    #[must_use]
    pub fn select(rule: &RecurrenceRule) -> Self {
        match rule.frequency() {
            Frequency::Monthly => rule
                .month_day()
                .or_else(|| {
                    rule.dt_start()
                        .and_then(|start| u8::try_from(start.as_datetime().day()).ok())
                        .map(MonthDay::Day)
                })
                .map_or(
                    Self::Stepped {
                        unit: CalendarUnit::Month,
                    },
                    Self::MonthDay,
                ),
            Frequency::Weekly if rule.interval() == 2 => Self::Fortnightly,
            Frequency::Weekly => Self::Weekly {
                weekday: rule.weekday(),
            },
            other => Self::Stepped {
                unit: other.step_unit(),
            },
        }
    }

    /// ## Summary
    /// Computes the next occurrence strictly after `from`.
    ///
    /// ## Errors
    /// Propagates cursor arithmetic and timezone resolution errors.
    pub fn advance(
        self,
        rule: &RecurrenceRule,
        from: &CalendarCursor,
    ) -> RecurResult<CalendarCursor> {
        match self {
            Self::Stepped { unit } => stepper::next_stepped(rule, from, unit, None),
            Self::Weekly { weekday } => {
                stepper::next_stepped(rule, from, CalendarUnit::Week, weekday.map(Into::into))
            }
            Self::Fortnightly => fortnight::next_fortnight(rule, from),
            Self::MonthDay(day) => monthly::next_month_day(rule, from, day),
        }
    }
}

/// ## Summary
/// Returns the next occurrence of `rule` strictly after `from`.
///
/// ## Errors
/// Propagates cursor arithmetic and timezone resolution errors.
pub fn next_occurrence(
    rule: &RecurrenceRule,
    from: &CalendarCursor,
) -> RecurResult<CalendarCursor> {
    let strategy = Advance::select(rule);
    let next = strategy.advance(rule, from)?;
    tracing::trace!(?strategy, from = %from, next = %next, "Advanced occurrence");
    Ok(next)
}
