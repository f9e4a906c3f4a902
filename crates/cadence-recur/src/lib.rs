//! Recurrence rule expansion.
//!
//! Turns a structured recurrence rule into a lazy, strictly increasing
//! sequence of timezone-aware occurrences, one step at a time.

pub mod error;
pub mod recur;

pub use recur::{
    Advance, CalendarCursor, CalendarUnit, Frequency, MonthDay, Occurrences, RecurrenceRule,
    RuleSpec, TimeZoneResolver, Weekday, next_occurrence,
};
