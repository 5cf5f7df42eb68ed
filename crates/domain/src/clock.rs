// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Injected time source.
//!
//! Stored timestamps are civil times in the league's zone, formatted as
//! `YYYY-MM-DDTHH:MM:SS` with no offset.

use crate::error::DomainError;
use chrono::DateTime;
use chrono_tz::Tz;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

/// The league's default civil time zone.
pub const DEFAULT_TIMEZONE: &str = "America/Mexico_City";

/// A source of the current instant plus the zone civil times are rendered in.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now_utc(&self) -> OffsetDateTime;

    /// The civil time zone.
    fn zone(&self) -> Tz;

    /// The current instant as a civil timestamp in [`Clock::zone`].
    fn civil_timestamp(&self) -> String {
        render_civil(self.now_utc(), self.zone())
    }
}

/// `YYYY-MM-DDTHH:MM:SS`, no offset.
const CIVIL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Renders `instant` as a civil timestamp in `zone`.
///
/// Every instant `time` can represent is inside chrono's range, so the
/// conversion only fails for values no clock produces. Those are rendered
/// in UTC rather than dropped.
fn render_civil(instant: OffsetDateTime, zone: Tz) -> String {
    DateTime::from_timestamp(instant.unix_timestamp(), instant.nanosecond()).map_or_else(
        || {
            instant
                .to_offset(UtcOffset::UTC)
                .format(CIVIL_FORMAT)
                .unwrap_or_default()
        },
        |utc| {
            utc.with_timezone(&zone)
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string()
        },
    )
}

/// Parses an IANA zone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    /// Creates a clock rendering civil times in `zone`.
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(chrono_tz::America::Mexico_City)
    }
}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn zone(&self) -> Tz {
        self.zone
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: OffsetDateTime,
    zone: Tz,
}

impl FixedClock {
    /// Creates a clock that always reports `instant`.
    #[must_use]
    pub const fn new(instant: OffsetDateTime, zone: Tz) -> Self {
        Self { instant, zone }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.instant
    }

    fn zone(&self) -> Tz {
        self.zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_civil_timestamp_uses_zone() {
        // Mexico City has been UTC-6 all year since 2022.
        let clock: FixedClock = FixedClock::new(
            datetime!(2026-07-04 18:30:15 UTC),
            chrono_tz::America::Mexico_City,
        );
        assert_eq!(clock.civil_timestamp(), "2026-07-04T12:30:15");
    }

    #[test]
    fn test_civil_timestamp_crosses_midnight() {
        let clock: FixedClock = FixedClock::new(datetime!(2026-01-01 03:00:00 UTC), chrono_tz::UTC);
        assert_eq!(clock.civil_timestamp(), "2026-01-01T03:00:00");

        let clock: FixedClock = FixedClock::new(
            datetime!(2026-01-01 03:00:00 UTC),
            chrono_tz::America::Mexico_City,
        );
        assert_eq!(clock.civil_timestamp(), "2025-12-31T21:00:00");
    }

    #[test]
    fn test_civil_timestamp_at_the_end_of_the_calendar() {
        let clock: FixedClock = FixedClock::new(
            datetime!(9999-12-31 23:59:59 UTC),
            chrono_tz::America::Mexico_City,
        );
        assert_eq!(clock.civil_timestamp(), "9999-12-31T17:59:59");
    }

    #[test]
    fn test_civil_format_matches_zone_rendering_in_utc() {
        let instant: OffsetDateTime = datetime!(2026-03-08 07:05:09 UTC);
        let formatted: String = instant.format(CIVIL_FORMAT).unwrap();
        assert_eq!(formatted, render_civil(instant, chrono_tz::UTC));
        assert_eq!(formatted, "2026-03-08T07:05:09");
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(
            parse_timezone(DEFAULT_TIMEZONE),
            Ok(chrono_tz::America::Mexico_City)
        );
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(DomainError::InvalidTimezone(String::from("Mars/Olympus")))
        );
    }

    #[test]
    fn test_system_clock_defaults_to_league_zone() {
        assert_eq!(
            SystemClock::default().zone(),
            chrono_tz::America::Mexico_City
        );
    }
}
