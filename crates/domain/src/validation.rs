// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::NewMatch;
use std::collections::HashSet;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const KICKOFF_INPUT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute][optional [:[second]]]"
);

/// Validates a score entered for a match.
///
/// # Errors
///
/// Returns `DomainError::InvalidScore` if the score is negative or does not
/// fit in a `u16`.
pub fn validate_score(score: i64) -> Result<u16, DomainError> {
    u16::try_from(score).map_err(|_| DomainError::InvalidScore(score))
}

/// Validates a matchweek sequence number.
///
/// # Errors
///
/// Returns `DomainError::InvalidWeekNumber` unless `1 <= week <= 65535`.
pub fn validate_week_number(week: i64) -> Result<u16, DomainError> {
    match u16::try_from(week) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(DomainError::InvalidWeekNumber(week)),
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parses a kickoff timestamp, `YYYY-MM-DDTHH:MM` with optional seconds.
///
/// # Errors
///
/// Returns `DomainError::KickoffParseError` if the string does not parse.
pub fn parse_kickoff(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    PrimitiveDateTime::parse(value, KICKOFF_INPUT_FORMAT).map_err(|e| {
        DomainError::KickoffParseError {
            value: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a kickoff as `YYYY-MM-DDTHH:MM:SS`.
#[must_use]
pub fn format_kickoff(kickoff: PrimitiveDateTime) -> String {
    format!(
        "{}T{:02}:{:02}:{:02}",
        format_date(kickoff.date()),
        kickoff.hour(),
        kickoff.minute(),
        kickoff.second()
    )
}

/// Validates a matchweek's date range.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `end_date` precedes `start_date`.
pub fn validate_matchweek_dates(start_date: Date, end_date: Date) -> Result<(), DomainError> {
    if end_date < start_date {
        return Err(DomainError::InvalidDateRange {
            start_date,
            end_date,
        });
    }
    Ok(())
}

/// Validates the full slate of matches for one matchweek.
///
/// This checks structure only. Whether the referenced teams exist requires
/// context and is checked by the caller.
///
/// # Errors
///
/// Returns an error if:
/// - A match lists the same team on both sides
/// - A team appears in more than one match
pub fn validate_match_slate(matches: &[NewMatch]) -> Result<(), DomainError> {
    let mut scheduled: HashSet<i64> = HashSet::new();

    for fixture in matches {
        if fixture.home_team_id == fixture.away_team_id {
            return Err(DomainError::TeamPlaysItself {
                team_id: fixture.home_team_id,
            });
        }

        for team_id in [fixture.home_team_id, fixture.away_team_id] {
            if !scheduled.insert(team_id) {
                return Err(DomainError::TeamScheduledTwice { team_id });
            }
        }
    }

    Ok(())
}

/// Validates team reference data.
///
/// # Errors
///
/// Returns `DomainError::InvalidTeam` if the name or short code is blank, or
/// the short code is longer than 5 characters.
pub fn validate_team_fields(name: &str, short_name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidTeam(String::from(
            "Team name cannot be empty",
        )));
    }

    let short_len: usize = short_name.trim().chars().count();
    if short_len == 0 || short_len > 5 {
        return Err(DomainError::InvalidTeam(String::from(
            "Short name must be 1 to 5 characters",
        )));
    }

    Ok(())
}

/// Validates the identity fields supplied at registration.
///
/// # Errors
///
/// Returns an error if:
/// - The name is blank
/// - The email lacks a local part, an `@`, or a dotted domain
pub fn validate_account_fields(email: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    let well_formed: bool = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    });
    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }

    Ok(())
}
