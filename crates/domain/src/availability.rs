// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Which teams a participant may still pick in the active matchweek.

use crate::types::{Match, PickHistoryEntry, Team};
use std::collections::HashSet;

/// Computes the teams a participant may pick in the active matchweek.
///
/// A team is removed when:
/// - the participant consumed it in any matchweek other than the active one
/// - it plays in a suspended match of the active matchweek
///
/// A team consumed by the participant's own pick in the active matchweek
/// stays available so the current pick can be re-submitted.
///
/// # Arguments
///
/// * `teams` - Every team in the league
/// * `history` - The participant's pick history
/// * `active_matchweek_id` - The single active matchweek
/// * `active_week_matches` - Every match of the active matchweek
///
/// # Returns
///
/// The remaining teams ordered by name, then id.
#[must_use]
pub fn available_teams(
    teams: &[Team],
    history: &[PickHistoryEntry],
    active_matchweek_id: i64,
    active_week_matches: &[Match],
) -> Vec<Team> {
    let used: HashSet<i64> = history
        .iter()
        .filter(|entry| entry.matchweek_id != active_matchweek_id)
        .map(|entry| entry.team_id)
        .collect();

    let suspended: HashSet<i64> = active_week_matches
        .iter()
        .filter(|fixture| fixture.matchweek_id == active_matchweek_id && !fixture.is_active)
        .flat_map(|fixture| [fixture.home_team_id, fixture.away_team_id])
        .collect();

    let mut available: Vec<Team> = teams
        .iter()
        .filter(|team| !used.contains(&team.team_id) && !suspended.contains(&team.team_id))
        .cloned()
        .collect();
    available.sort_by(|a, b| a.name.cmp(&b.name).then(a.team_id.cmp(&b.team_id)));
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchStatus;
    use time::macros::datetime;

    const ACTIVE_WEEK: i64 = 5;

    fn team(team_id: i64, name: &str) -> Team {
        Team {
            team_id,
            name: name.to_string(),
            short_name: name[..3].to_uppercase(),
            logo_url: None,
            stadium: None,
        }
    }

    fn league() -> Vec<Team> {
        vec![
            team(1, "Toluca"),
            team(2, "America"),
            team(3, "Pumas"),
            team(4, "Necaxa"),
            team(5, "Leon"),
            team(6, "Atlas"),
        ]
    }

    fn fixture(match_id: i64, home: i64, away: i64, is_active: bool) -> Match {
        Match {
            match_id,
            matchweek_id: ACTIVE_WEEK,
            home_team_id: home,
            away_team_id: away,
            kickoff: datetime!(2026-09-12 21:00:00),
            status: MatchStatus::Scheduled,
            is_active,
            home_score: None,
            away_score: None,
        }
    }

    fn used(team_id: i64, matchweek_id: i64) -> PickHistoryEntry {
        PickHistoryEntry {
            user_id: 1,
            team_id,
            matchweek_id,
        }
    }

    fn names(teams: &[Team]) -> Vec<&str> {
        teams.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_everything_available_without_history() {
        let matches: Vec<Match> = vec![fixture(1, 1, 2, true), fixture(2, 3, 4, true)];
        let result: Vec<Team> = available_teams(&league(), &[], ACTIVE_WEEK, &matches);
        assert_eq!(
            names(&result),
            vec!["America", "Atlas", "Leon", "Necaxa", "Pumas", "Toluca"]
        );
    }

    #[test]
    fn test_suspended_match_removes_both_teams_for_everyone() {
        let matches: Vec<Match> = vec![fixture(1, 1, 2, false), fixture(2, 3, 4, true)];
        let result: Vec<Team> = available_teams(&league(), &[], ACTIVE_WEEK, &matches);
        assert_eq!(names(&result), vec!["Atlas", "Leon", "Necaxa", "Pumas"]);
    }

    #[test]
    fn test_teams_used_in_past_weeks_are_removed() {
        let history: Vec<PickHistoryEntry> = vec![used(3, 1), used(6, 2)];
        let result: Vec<Team> = available_teams(&league(), &history, ACTIVE_WEEK, &[]);
        assert_eq!(names(&result), vec!["America", "Leon", "Necaxa", "Toluca"]);
    }

    #[test]
    fn test_current_week_pick_stays_available() {
        let history: Vec<PickHistoryEntry> = vec![used(3, 1), used(5, ACTIVE_WEEK)];
        let result: Vec<Team> = available_teams(&league(), &history, ACTIVE_WEEK, &[]);
        assert!(names(&result).contains(&"Leon"));
        assert!(!names(&result).contains(&"Pumas"));
    }
}
