//! Recurrence rule model.
//!
//! [`RecurrenceRule`] is the canonical, validated rule every advancement
//! strategy consumes. [`RuleSpec`] is its wire shape: it deserializes the
//! JSON form (including legacy property names and numeric enum codes) and
//! is converted once, applying defaults and validation.

use std::fmt;

use cadence_core::constants::DEFAULT_TZID;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{RecurError, RecurResult};

use super::cursor::{CalendarCursor, CalendarUnit};
use super::timezone::TimeZoneResolver;

/// Recurrence frequency, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "EnumCode")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SECONDLY" => Self::Secondly,
            "MINUTELY" => Self::Minutely,
            "HOURLY" => Self::Hourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }

    /// Granularity rank: `SECONDLY` is 0, `YEARLY` is 6.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Secondly => 0,
            Self::Minutely => 1,
            Self::Hourly => 2,
            Self::Daily => 3,
            Self::Weekly => 4,
            Self::Monthly => 5,
            Self::Yearly => 6,
        }
    }

    /// Inverse of [`Self::rank`].
    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        Some(match rank {
            0 => Self::Secondly,
            1 => Self::Minutely,
            2 => Self::Hourly,
            3 => Self::Daily,
            4 => Self::Weekly,
            5 => Self::Monthly,
            6 => Self::Yearly,
            _ => return None,
        })
    }

    /// The calendar unit one step of this frequency advances by.
    #[must_use]
    pub const fn step_unit(self) -> CalendarUnit {
        match self {
            Self::Secondly => CalendarUnit::Second,
            Self::Minutely => CalendarUnit::Minute,
            Self::Hourly => CalendarUnit::Hour,
            Self::Daily => CalendarUnit::Day,
            Self::Weekly => CalendarUnit::Week,
            Self::Monthly => CalendarUnit::Month,
            Self::Yearly => CalendarUnit::Year,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<EnumCode> for Frequency {
    type Error = String;

    fn try_from(code: EnumCode) -> Result<Self, Self::Error> {
        match code {
            EnumCode::Code(rank) => {
                Self::from_rank(rank).ok_or_else(|| format!("unknown frequency code {rank}"))
            }
            EnumCode::Name(name) => {
                Self::parse(&name).ok_or_else(|| format!("unknown frequency {name:?}"))
            }
        }
    }
}

/// Day of the week. Legacy numeric codes run `MO = 0` through `SU = 6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "EnumCode")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }

    /// Parses a weekday from a two-letter abbreviation (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            "SU" => Self::Sunday,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Monday,
            1 => Self::Tuesday,
            2 => Self::Wednesday,
            3 => Self::Thursday,
            4 => Self::Friday,
            5 => Self::Saturday,
            6 => Self::Sunday,
            _ => return None,
        })
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => Self::Mon,
            Weekday::Tuesday => Self::Tue,
            Weekday::Wednesday => Self::Wed,
            Weekday::Thursday => Self::Thu,
            Weekday::Friday => Self::Fri,
            Weekday::Saturday => Self::Sat,
            Weekday::Sunday => Self::Sun,
        }
    }
}

impl TryFrom<EnumCode> for Weekday {
    type Error = String;

    fn try_from(code: EnumCode) -> Result<Self, Self::Error> {
        match code {
            EnumCode::Code(n) => Self::from_code(n).ok_or_else(|| format!("unknown weekday code {n}")),
            EnumCode::Name(name) => {
                Self::parse(&name).ok_or_else(|| format!("unknown weekday {name:?}"))
            }
        }
    }
}

/// A `byMonthDay` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthDay {
    /// A fixed day of the month, 1-31.
    Day(u8),
    /// The last calendar day of the month, written `-1`.
    Last,
}

impl TryFrom<i8> for MonthDay {
    type Error = RecurError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Last),
            1..=31 => Ok(Self::Day(value.unsigned_abs())),
            _ => Err(RecurError::InvalidRule(format!(
                "byMonthDay value {value} is outside 1-31 or -1"
            ))),
        }
    }
}

/// Canonical recurrence rule.
///
/// Only the first entry of each `by_*` list takes part in expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    by_day: Vec<Weekday>,
    by_month_day: Vec<MonthDay>,
    by_hour: Vec<u8>,
    by_minute: Vec<u8>,
    by_second: Vec<u8>,
    count: Option<u32>,
    dt_start: Option<DateTime<Utc>>,
    tz: Tz,
}

impl RecurrenceRule {
    /// Creates a rule with interval 1 in UTC and no constraints.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_hour: Vec::new(),
            by_minute: Vec::new(),
            by_second: Vec::new(),
            count: None,
            dt_start: None,
            tz: Tz::UTC,
        }
    }

    /// Sets the interval. Zero is treated as the default of 1.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Sets the occurrence cap. Zero clears it.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = (count > 0).then_some(count);
        self
    }

    #[must_use]
    pub fn with_by_day(mut self, days: Vec<Weekday>) -> Self {
        self.by_day = days;
        self
    }

    /// ## Errors
    /// Returns `RecurError::InvalidRule` if a fixed day is outside 1-31.
    pub fn with_by_month_day(mut self, days: Vec<MonthDay>) -> RecurResult<Self> {
        if let Some(MonthDay::Day(day)) = days
            .iter()
            .find(|d| matches!(d, MonthDay::Day(n) if !(1..=31).contains(n)))
        {
            return Err(RecurError::InvalidRule(format!(
                "byMonthDay value {day} is outside 1-31 or -1"
            )));
        }
        self.by_month_day = days;
        Ok(self)
    }

    /// ## Errors
    /// Returns `RecurError::InvalidRule` if an hour is above 23.
    pub fn with_by_hour(mut self, hours: Vec<u8>) -> RecurResult<Self> {
        self.by_hour = check_range("byHour", hours, 23)?;
        Ok(self)
    }

    /// ## Errors
    /// Returns `RecurError::InvalidRule` if a minute is above 59.
    pub fn with_by_minute(mut self, minutes: Vec<u8>) -> RecurResult<Self> {
        self.by_minute = check_range("byMinute", minutes, 59)?;
        Ok(self)
    }

    /// ## Errors
    /// Returns `RecurError::InvalidRule` if a second is above 59.
    pub fn with_by_second(mut self, seconds: Vec<u8>) -> RecurResult<Self> {
        self.by_second = check_range("bySecond", seconds, 59)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_dt_start<T: TimeZone>(mut self, dt_start: &DateTime<T>) -> Self {
        self.dt_start = Some(dt_start.with_timezone(&Utc));
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    #[must_use]
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    #[must_use]
    pub fn by_day(&self) -> &[Weekday] {
        &self.by_day
    }

    #[must_use]
    pub fn by_month_day(&self) -> &[MonthDay] {
        &self.by_month_day
    }

    /// First `byDay` entry, the only one honored.
    #[must_use]
    pub fn weekday(&self) -> Option<Weekday> {
        self.by_day.first().copied()
    }

    /// First `byMonthDay` entry, the only one honored.
    #[must_use]
    pub fn month_day(&self) -> Option<MonthDay> {
        self.by_month_day.first().copied()
    }

    #[must_use]
    pub fn hour(&self) -> Option<u32> {
        self.by_hour.first().copied().map(u32::from)
    }

    #[must_use]
    pub fn minute(&self) -> Option<u32> {
        self.by_minute.first().copied().map(u32::from)
    }

    #[must_use]
    pub fn second(&self) -> Option<u32> {
        self.by_second.first().copied().map(u32::from)
    }

    /// `dtStart` as a cursor in the rule's timezone.
    #[must_use]
    pub fn dt_start(&self) -> Option<CalendarCursor> {
        self.dt_start
            .map(|start| CalendarCursor::new(&start, self.tz))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        if let Some(day) = self.weekday() {
            write!(f, ";BYDAY={day}")?;
        }
        match self.month_day() {
            Some(MonthDay::Day(day)) => write!(f, ";BYMONTHDAY={day}")?,
            Some(MonthDay::Last) => write!(f, ";BYMONTHDAY=-1")?,
            None => {}
        }
        if let Some(hour) = self.hour() {
            write!(f, ";BYHOUR={hour}")?;
        }
        if let Some(minute) = self.minute() {
            write!(f, ";BYMINUTE={minute}")?;
        }
        if let Some(second) = self.second() {
            write!(f, ";BYSECOND={second}")?;
        }
        write!(f, ";TZID={}", self.tz.name())
    }
}

fn check_range(field: &str, values: Vec<u8>, max: u8) -> RecurResult<Vec<u8>> {
    if let Some(bad) = values.iter().find(|v| **v > max) {
        return Err(RecurError::InvalidRule(format!(
            "{field} value {bad} is outside 0-{max}"
        )));
    }
    Ok(values)
}

/// Either a name (`"WEEKLY"`, `"MO"`) or a legacy numeric code.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EnumCode {
    Code(u8),
    Name(String),
}

/// A single value or a list; legacy payloads send scalars for `by*` fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    OneOrMany::<T>::deserialize(deserializer).map(Vec::from)
}

/// A timestamp with an explicit offset, or a local time read in the rule's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateTimeValue {
    Instant(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

/// `dtStart` as sent on the wire: bare, or wrapped as `{ "date": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DtStartSpec {
    Bare(DateTimeValue),
    Wrapped { date: DateTimeValue },
}

impl DtStartSpec {
    fn value(&self) -> &DateTimeValue {
        match self {
            Self::Bare(value) | Self::Wrapped { date: value } => value,
        }
    }
}

/// Wire shape of a recurrence rule.
///
/// Legacy property names (`dayOfWeek`, `startdate`, `byhour`, `byminute`,
/// `bysecond`) are folded into their canonical fields here, so nothing past
/// deserialization ever sees them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub interval: Option<u32>,
    #[serde(default, alias = "dayOfWeek", deserialize_with = "one_or_many")]
    pub by_day: Vec<Weekday>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub by_month_day: Vec<i8>,
    #[serde(default, alias = "byhour", deserialize_with = "one_or_many")]
    pub by_hour: Vec<u8>,
    #[serde(default, alias = "byminute", deserialize_with = "one_or_many")]
    pub by_minute: Vec<u8>,
    #[serde(default, alias = "bysecond", deserialize_with = "one_or_many")]
    pub by_second: Vec<u8>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default, alias = "startdate")]
    pub dt_start: Option<DtStartSpec>,
    #[serde(default)]
    pub tz_id: Option<String>,
}

impl RuleSpec {
    /// ## Summary
    /// Applies defaults and validation, producing the canonical rule.
    ///
    /// ## Errors
    /// - `RecurError::MissingFrequency` if `frequency` is absent
    /// - `RecurError::InvalidRule` for out-of-range `by*` values
    /// - `RecurError::Timezone` for an unknown `tzId` or an unresolvable local `dtStart`
    pub fn into_rule(self, resolver: &mut TimeZoneResolver) -> RecurResult<RecurrenceRule> {
        let frequency = self.frequency.ok_or(RecurError::MissingFrequency)?;
        let tz = resolver.resolve(self.tz_id.as_deref().unwrap_or(DEFAULT_TZID))?;

        let month_days = self
            .by_month_day
            .into_iter()
            .map(MonthDay::try_from)
            .collect::<RecurResult<Vec<_>>>()?;

        let mut rule = RecurrenceRule::new(frequency)
            .with_timezone(tz)
            .with_interval(self.interval.unwrap_or(1))
            .with_count(self.count.unwrap_or(0))
            .with_by_day(self.by_day)
            .with_by_month_day(month_days)?
            .with_by_hour(self.by_hour)?
            .with_by_minute(self.by_minute)?
            .with_by_second(self.by_second)?;

        if let Some(dt_start) = self.dt_start {
            let start = match dt_start.value() {
                DateTimeValue::Instant(instant) => CalendarCursor::new(instant, tz),
                DateTimeValue::Local(local) => CalendarCursor::from_local(tz, *local)?,
            };
            rule = rule.with_dt_start(start.as_datetime());
        }

        tracing::trace!(rule = %rule, "Normalized recurrence rule");
        Ok(rule)
    }
}

impl TryFrom<RuleSpec> for RecurrenceRule {
    type Error = RecurError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        spec.into_rule(&mut TimeZoneResolver::new())
    }
}
