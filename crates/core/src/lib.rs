// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{
    plan_match_activity, plan_matchweek_activation, plan_pick, plan_slate_removal,
    plan_slate_replacement, resolve_match,
};
pub use command::{
    Actor, FinalizeMatch, ReplaceMatches, SetMatchesActive, SetMatchweekActive, SubmitPick,
};
pub use error::CoreError;
pub use state::{
    ActivationPlan, FinalizeContext, FinalizePlan, HistoryChange, PickContext, PickPlan,
    PickResolution, PickWrite, SlateContext, SlatePlan,
};
