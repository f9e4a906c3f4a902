//! Timezone-bound calendar arithmetic.
//!
//! A [`CalendarCursor`] is an immutable point in time bound to a timezone.
//! Every operation returns a new cursor; nothing is mutated in place.
//!
//! Second, minute and hour additions are absolute (a fixed number of
//! elapsed seconds). Day, week, month and year additions are calendar
//! arithmetic on the local wall-clock time, so a daily step across a DST
//! change keeps the same local time.

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, SecondsFormat,
    SubsecRound, TimeDelta, TimeZone, Timelike,
};
use chrono_tz::Tz;

use super::timezone::{ConversionError, resolve_local};

/// Step units understood by [`CalendarCursor::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Fortnight,
    Month,
    Year,
}

/// A timezone-bound timestamp with calendar-aware setters and adders.
///
/// Ordering compares the underlying instants, so cursors in different
/// timezones still order correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarCursor {
    at: DateTime<Tz>,
}

type CursorResult = Result<CalendarCursor, ConversionError>;

impl CalendarCursor {
    /// Binds `instant` to `tz`. The instant itself is unchanged.
    #[must_use]
    pub fn new<T: TimeZone>(instant: &DateTime<T>, tz: Tz) -> Self {
        Self {
            at: instant.with_timezone(&tz),
        }
    }

    /// ## Summary
    /// Builds a cursor from a local wall-clock time in `tz`.
    ///
    /// ## Errors
    /// Returns an error if the local time cannot be resolved (see
    /// [`resolve_local`]).
    pub fn from_local(tz: Tz, local: NaiveDateTime) -> CursorResult {
        Ok(Self {
            at: resolve_local(tz, local, None)?,
        })
    }

    /// Drops any fractional second.
    #[must_use]
    pub fn truncate_subsecs(self) -> Self {
        Self {
            at: self.at.trunc_subsecs(0),
        }
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.at.timezone()
    }

    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Tz> {
        &self.at
    }

    #[must_use]
    pub fn into_datetime(self) -> DateTime<Tz> {
        self.at
    }

    #[must_use]
    pub fn date_naive(&self) -> NaiveDate {
        self.at.date_naive()
    }

    #[must_use]
    pub fn second(&self) -> u32 {
        self.at.second()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.at.minute()
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.at.hour()
    }

    /// Day of the month, starting at 1.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.at.day()
    }

    #[must_use]
    pub fn weekday(&self) -> chrono::Weekday {
        self.at.weekday()
    }

    /// Number of days in the cursor's current local month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.date_naive())
    }

    #[must_use]
    pub fn is_last_day_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// ## Summary
    /// Advances (or, for a negative `amount`, rewinds) by `amount` units.
    ///
    /// Month and year arithmetic clamps to the end of shorter months, so
    /// January 31 plus one month is the last day of February.
    ///
    /// ## Errors
    /// Returns `ConversionError::InvalidDateTime` on overflow, or a
    /// resolution error if the new local time cannot be placed in the
    /// cursor's timezone.
    pub fn add(self, unit: CalendarUnit, amount: i64) -> CursorResult {
        match unit {
            CalendarUnit::Second => self.shift(TimeDelta::try_seconds(amount)),
            CalendarUnit::Minute => self.shift(TimeDelta::try_minutes(amount)),
            CalendarUnit::Hour => self.shift(TimeDelta::try_hours(amount)),
            CalendarUnit::Day => self.shift_days(amount),
            CalendarUnit::Week => self.shift_days(checked_scale(amount, 7)?),
            CalendarUnit::Fortnight => self.shift_days(checked_scale(amount, 14)?),
            CalendarUnit::Month => self.shift_months(amount),
            CalendarUnit::Year => self.shift_months(checked_scale(amount, 12)?),
        }
    }

    /// ## Summary
    /// Sets the second-of-minute.
    ///
    /// Implemented as an absolute shift so the result stays on the same
    /// side of a DST fold.
    ///
    /// ## Errors
    /// Returns `ConversionError::InvalidDateTime` if `second` is not 0-59.
    pub fn with_second(self, second: u32) -> CursorResult {
        if second > 59 {
            return Err(ConversionError::InvalidDateTime(format!("second {second}")));
        }
        let delta = i64::from(second) - i64::from(self.second());
        self.shift(TimeDelta::try_seconds(delta))
    }

    /// ## Summary
    /// Sets the minute-of-hour, with the same fold behavior as [`Self::with_second`].
    ///
    /// ## Errors
    /// Returns `ConversionError::InvalidDateTime` if `minute` is not 0-59.
    pub fn with_minute(self, minute: u32) -> CursorResult {
        if minute > 59 {
            return Err(ConversionError::InvalidDateTime(format!("minute {minute}")));
        }
        let delta = i64::from(minute) - i64::from(self.minute());
        self.shift(TimeDelta::try_minutes(delta))
    }

    /// ## Summary
    /// Sets the local hour-of-day.
    ///
    /// ## Errors
    /// Returns `ConversionError::InvalidDateTime` if `hour` is not 0-23, or a
    /// resolution error if the local time falls in an unresolvable gap.
    pub fn with_hour(self, hour: u32) -> CursorResult {
        let local = self
            .at
            .naive_local()
            .with_hour(hour)
            .ok_or_else(|| ConversionError::InvalidDateTime(format!("hour {hour}")))?;
        self.relocate(local)
    }

    /// ## Summary
    /// Sets the local day-of-month.
    ///
    /// If the current month has no such day, the cursor rolls forward to the
    /// first following month that does: day 31 in April lands on May 31.
    ///
    /// ## Errors
    /// Returns `ConversionError::InvalidDateTime` if `day` is not 1-31.
    pub fn with_day(self, day: u32) -> CursorResult {
        if !(1..=31).contains(&day) {
            return Err(ConversionError::InvalidDateTime(format!("day of month {day}")));
        }

        let mut month_start = self
            .date_naive()
            .with_day(1)
            .ok_or_else(|| ConversionError::InvalidDateTime(self.to_rfc3339()))?;
        // Every run of twelve consecutive months contains a 31-day month.
        for _ in 0..12 {
            if days_in_month(month_start) >= day {
                let date = month_start
                    .with_day(day)
                    .ok_or_else(|| ConversionError::InvalidDateTime(format!("day {day}")))?;
                return self.relocate(date.and_time(self.at.naive_local().time()));
            }
            month_start = month_start
                .checked_add_months(Months::new(1))
                .ok_or_else(|| ConversionError::InvalidDateTime(self.to_rfc3339()))?;
        }

        Err(ConversionError::InvalidDateTime(format!(
            "no month after {} has day {day}",
            self.to_rfc3339()
        )))
    }

    /// ## Summary
    /// Moves to the last day of the current local month, keeping the time of day.
    ///
    /// ## Errors
    /// Returns a resolution error if the resulting local time falls in an
    /// unresolvable gap.
    pub fn with_last_day(self) -> CursorResult {
        let date = self
            .date_naive()
            .with_day(self.days_in_month())
            .ok_or_else(|| ConversionError::InvalidDateTime(self.to_rfc3339()))?;
        self.relocate(date.and_time(self.at.naive_local().time()))
    }

    /// ## Summary
    /// Moves to `weekday` within the cursor's Monday-start week, keeping the
    /// time of day. The result may be earlier than the cursor.
    ///
    /// ## Errors
    /// Returns a resolution error if the resulting local time falls in an
    /// unresolvable gap.
    pub fn with_weekday(self, weekday: chrono::Weekday) -> CursorResult {
        let delta = i64::from(weekday.num_days_from_monday())
            - i64::from(self.weekday().num_days_from_monday());
        self.shift_days(delta)
    }

    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    fn offset(&self) -> FixedOffset {
        self.at.offset().fix()
    }

    fn shift(self, delta: Option<TimeDelta>) -> CursorResult {
        delta
            .and_then(|delta| self.at.checked_add_signed(delta))
            .map(|at| Self { at })
            .ok_or_else(|| ConversionError::InvalidDateTime(format!("{} shifted", self.to_rfc3339())))
    }

    fn shift_days(self, days: i64) -> CursorResult {
        let local = TimeDelta::try_days(days)
            .and_then(|delta| self.at.naive_local().checked_add_signed(delta))
            .ok_or_else(|| {
                ConversionError::InvalidDateTime(format!("{} + {days} days", self.to_rfc3339()))
            })?;
        self.relocate(local)
    }

    fn shift_months(self, months: i64) -> CursorResult {
        let overflow =
            || ConversionError::InvalidDateTime(format!("{} + {months} months", self.to_rfc3339()));
        let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_e| overflow())?;
        let local = self.at.naive_local();
        let shifted = if months >= 0 {
            local.checked_add_months(Months::new(magnitude))
        } else {
            local.checked_sub_months(Months::new(magnitude))
        };
        self.relocate(shifted.ok_or_else(overflow)?)
    }

    /// Re-resolves a new local time, preferring the cursor's current offset in a fold.
    fn relocate(self, local: NaiveDateTime) -> CursorResult {
        Ok(Self {
            at: resolve_local(self.timezone(), local, Some(self.offset()))?,
        })
    }
}

impl fmt::Display for CalendarCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl From<CalendarCursor> for DateTime<Tz> {
    fn from(cursor: CalendarCursor) -> Self {
        cursor.at
    }
}

fn checked_scale(amount: i64, factor: i64) -> Result<i64, ConversionError> {
    amount
        .checked_mul(factor)
        .ok_or_else(|| ConversionError::InvalidDateTime(format!("{amount} x {factor} overflows")))
}

fn days_in_month(date: NaiveDate) -> u32 {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}
