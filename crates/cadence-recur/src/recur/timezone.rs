//! Timezone resolution and local wall-clock disambiguation.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

/// Error during timezone conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),

    /// Date arithmetic left the representable range.
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),
}

/// Resolver for timezone identifiers.
///
/// Maintains a cache of resolved timezones so that a batch of rules sharing
/// a TZID only pays for normalization once.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    /// Cache of resolved IANA timezones by TZID.
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    /// Creates a new timezone resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a timezone identifier to a `chrono_tz::Tz`.
    ///
    /// IANA names are accepted as-is. Anything else goes through
    /// normalization, so Windows names and legacy aliases resolve too.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
    ///
    /// ## Side Effects
    ///
    /// Caches successful resolutions to avoid repeated parsing.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(tz) = self.cache.get(tzid) {
            return Ok(*tz);
        }

        let tz = match Tz::from_str(tzid) {
            Ok(tz) => tz,
            Err(_) => {
                let normalized = normalize_tzid(tzid);
                Tz::from_str(&normalized)
                    .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?
            }
        };

        tracing::trace!(tzid, resolved = tz.name(), "Resolved timezone");
        self.cache.insert(tzid.to_string(), tz);

        Ok(tz)
    }
}

/// Normalizes common calendar-client timezone identifiers to IANA names.
///
/// Uses ICU4X for Windows timezone ID mapping and IANA canonicalization.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        let iana_parser = IanaParserExtended::new();
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    // Handles aliases like Europe/Kiev -> Europe/Kyiv
    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Resolves a local wall-clock time in `tz` to a concrete instant.
///
/// - Unambiguous times map directly.
/// - In a DST fold the instant carrying `prefer` wins when it is one of the
///   two candidates, otherwise the earlier instant is used.
/// - In a DST gap the time is shifted forward by one hour.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the shifted time still
/// falls in a gap, or `ConversionError::InvalidDateTime` if shifting
/// overflows.
pub fn resolve_local(
    tz: Tz,
    local: NaiveDateTime,
    prefer: Option<chrono::FixedOffset>,
) -> Result<DateTime<Tz>, ConversionError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, latest) => {
            if prefer == Some(latest.offset().fix()) {
                Ok(latest)
            } else {
                Ok(earliest)
            }
        }
        LocalResult::None => {
            let shifted = local
                .checked_add_signed(TimeDelta::hours(1))
                .ok_or_else(|| ConversionError::InvalidDateTime(format!("{local} + 1h")))?;
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    tracing::warn!(%local, tz = tz.name(), shifted = %dt, "Shifted local time out of DST gap");
                    Ok(dt)
                }
                LocalResult::None => Err(ConversionError::NonExistentTime(format!(
                    "{local} in timezone {}",
                    tz.name()
                ))),
            }
        }
    }
}
