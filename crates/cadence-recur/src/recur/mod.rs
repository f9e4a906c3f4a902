//! Recurrence model and expansion.
//!
//! - `rule`: the canonical rule and its wire shape
//! - `cursor`: immutable timezone-bound calendar arithmetic
//! - `timezone`: TZID resolution and local-time disambiguation
//! - `expand`: per-frequency advancement strategies
//! - `sequence`: the bounded occurrence iterator

pub mod cursor;
pub mod expand;
pub mod rule;
pub mod sequence;
pub mod timezone;

pub use cursor::{CalendarCursor, CalendarUnit};
pub use expand::{Advance, next_occurrence};
pub use rule::{Frequency, MonthDay, RecurrenceRule, RuleSpec, Weekday};
pub use sequence::Occurrences;
pub use timezone::TimeZoneResolver;
