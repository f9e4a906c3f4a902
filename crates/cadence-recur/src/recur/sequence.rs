//! Bounded, pull-based occurrence sequence.

use std::iter::FusedIterator;

use cadence_core::constants::DEFAULT_OCCURRENCE_COUNT;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::RecurResult;

use super::cursor::CalendarCursor;
use super::expand::next_occurrence;
use super::rule::{RecurrenceRule, RuleSpec};

/// Lazily expands a rule, one occurrence per pull.
///
/// The sequence is finite and strictly increasing. It is not restartable:
/// build a new `Occurrences` to replay from the start. If an advancement
/// step fails the error is yielded once and the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    cursor: CalendarCursor,
    remaining: u32,
}

impl Occurrences {
    /// ## Summary
    /// Creates a sequence starting strictly after `start` (default: now).
    ///
    /// The effective count is the rule's `count`, else `count`, else
    /// [`DEFAULT_OCCURRENCE_COUNT`]. Fractional seconds on `start` are dropped.
    #[must_use]
    pub fn new(rule: RecurrenceRule, start: Option<DateTime<Utc>>, count: Option<u32>) -> Self {
        let remaining = rule
            .count()
            .or_else(|| count.filter(|c| *c > 0))
            .unwrap_or(DEFAULT_OCCURRENCE_COUNT);
        let cursor =
            CalendarCursor::new(&start.unwrap_or_else(Utc::now), rule.timezone()).truncate_subsecs();

        tracing::debug!(rule = %rule, start = %cursor, remaining, "Created occurrence sequence");

        Self {
            rule,
            cursor,
            remaining,
        }
    }

    /// ## Summary
    /// Normalizes `spec` and creates a sequence from it.
    ///
    /// ## Errors
    /// Returns `RecurError::MissingFrequency` if the rule has no frequency,
    /// or any other construction error from [`RuleSpec::into_rule`].
    pub fn from_spec(
        spec: RuleSpec,
        start: Option<DateTime<Utc>>,
        count: Option<u32>,
    ) -> RecurResult<Self> {
        let rule = RecurrenceRule::try_from(spec)?;
        Ok(Self::new(rule, start, count))
    }

    #[must_use]
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// The last emitted occurrence, or the start before the first pull.
    #[must_use]
    pub fn cursor(&self) -> &CalendarCursor {
        &self.cursor
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Iterator for Occurrences {
    type Item = RecurResult<DateTime<Tz>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match next_occurrence(&self.rule, &self.cursor) {
            Ok(next) => {
                self.cursor = next;
                self.remaining -= 1;
                Some(Ok(next.into_datetime()))
            }
            Err(e) => {
                tracing::debug!(error = %e, cursor = %self.cursor, "Occurrence sequence aborted");
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, usize::try_from(self.remaining).ok())
    }
}

impl FusedIterator for Occurrences {}
