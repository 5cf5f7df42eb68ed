// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Classification of a final score relative to a picked team.
//!
//! A pick's team is not assumed to be the home side: the outcome is always
//! computed from whichever side the team occupies in its match.

use crate::error::DomainError;
use crate::types::{Match, PickResult, Side};

/// Classifies a final score from the point of view of `side`.
///
/// Equal scores are a draw. Otherwise `side` wins only if it strictly
/// outscored the other side; anything else is a loss.
#[must_use]
pub const fn classify_outcome(home_score: u16, away_score: u16, side: Side) -> PickResult {
    if home_score == away_score {
        return PickResult::Draw;
    }

    let (ours, theirs) = match side {
        Side::Home => (home_score, away_score),
        Side::Away => (away_score, home_score),
    };

    if ours > theirs {
        PickResult::Win
    } else {
        PickResult::Loss
    }
}

/// Classifies a final score for the team a pick chose in `fixture`.
///
/// # Arguments
///
/// * `fixture` - The match the pick references
/// * `team_id` - The picked team
/// * `home_score` - Final home score
/// * `away_score` - Final away score
///
/// # Errors
///
/// Returns `DomainError::TeamNotInMatch` if the team is on neither side.
pub fn classify_pick(
    fixture: &Match,
    team_id: i64,
    home_score: u16,
    away_score: u16,
) -> Result<PickResult, DomainError> {
    let side: Side = fixture
        .side_of(team_id)
        .ok_or(DomainError::TeamNotInMatch {
            team_id,
            match_id: fixture.match_id,
        })?;
    Ok(classify_outcome(home_score, away_score, side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchStatus;
    use time::macros::datetime;

    fn fixture() -> Match {
        Match {
            match_id: 7,
            matchweek_id: 1,
            home_team_id: 10,
            away_team_id: 20,
            kickoff: datetime!(2026-08-15 19:00:00),
            status: MatchStatus::Scheduled,
            is_active: true,
            home_score: None,
            away_score: None,
        }
    }

    #[test]
    fn test_home_win_is_away_loss() {
        assert_eq!(classify_outcome(2, 1, Side::Home), PickResult::Win);
        assert_eq!(classify_outcome(2, 1, Side::Away), PickResult::Loss);
    }

    #[test]
    fn test_away_win_is_home_loss() {
        assert_eq!(classify_outcome(0, 3, Side::Away), PickResult::Win);
        assert_eq!(classify_outcome(0, 3, Side::Home), PickResult::Loss);
    }

    #[test]
    fn test_equal_scores_are_a_draw_for_either_side() {
        assert_eq!(classify_outcome(1, 1, Side::Home), PickResult::Draw);
        assert_eq!(classify_outcome(1, 1, Side::Away), PickResult::Draw);
        assert_eq!(classify_outcome(0, 0, Side::Away), PickResult::Draw);
    }

    #[test]
    fn test_classify_pick_uses_the_picked_side() {
        let m: Match = fixture();
        assert_eq!(classify_pick(&m, 10, 2, 1), Ok(PickResult::Win));
        assert_eq!(classify_pick(&m, 20, 2, 1), Ok(PickResult::Loss));
    }

    #[test]
    fn test_classify_pick_rejects_outside_team() {
        let m: Match = fixture();
        assert_eq!(
            classify_pick(&m, 99, 2, 1),
            Err(DomainError::TeamNotInMatch {
                team_id: 99,
                match_id: 7
            })
        );
    }

    #[test]
    fn test_points_and_correctness() {
        assert_eq!(PickResult::Win.points(), 3);
        assert_eq!(PickResult::Draw.points(), 1);
        assert_eq!(PickResult::Loss.points(), 0);
        assert_eq!(PickResult::Pending.points(), 0);

        assert_eq!(PickResult::Win.is_correct(), Some(true));
        assert_eq!(PickResult::Draw.is_correct(), Some(true));
        assert_eq!(PickResult::Loss.is_correct(), Some(false));
        assert_eq!(PickResult::Pending.is_correct(), None);
    }
}
