// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Actor;
use survivor_pool_domain::{Match, MatchStatus, Matchweek, Pick, PickHistoryEntry, PickResult, Role};
use time::macros::{date, datetime};

pub const PARTICIPANT_ID: i64 = 11;

pub fn participant() -> Actor {
    Actor::new(PARTICIPANT_ID, Role::User)
}

pub fn administrator() -> Actor {
    Actor::new(1, Role::Superadmin)
}

pub fn matchweek(matchweek_id: i64, week_number: u16, is_active: bool) -> Matchweek {
    Matchweek {
        matchweek_id,
        week_number,
        name: Some(format!("Jornada {week_number}")),
        season: Some(String::from("Apertura 2026")),
        start_date: date!(2026 - 08 - 14),
        end_date: date!(2026 - 08 - 17),
        is_active,
    }
}

pub fn fixture(match_id: i64, matchweek_id: i64, home: i64, away: i64) -> Match {
    Match {
        match_id,
        matchweek_id,
        home_team_id: home,
        away_team_id: away,
        kickoff: datetime!(2026-08-15 19:00:00),
        status: MatchStatus::Scheduled,
        is_active: true,
        home_score: None,
        away_score: None,
    }
}

pub fn pick(pick_id: i64, user_id: i64, matchweek_id: i64, team_id: i64, match_id: i64) -> Pick {
    Pick {
        pick_id,
        user_id,
        matchweek_id,
        team_id,
        match_id,
        result: PickResult::Pending,
    }
}

pub fn used(team_id: i64, matchweek_id: i64) -> PickHistoryEntry {
    PickHistoryEntry {
        user_id: PARTICIPANT_ID,
        team_id,
        matchweek_id,
    }
}
