//! Bracket logic: round names, eligibility, seeding, round detection, progression.

mod detection;
mod eligibility;
mod overview;
mod progression;
mod round_names;
mod seeding;

pub use detection::{
    detect_latest_round, sort_rounds, HierarchyOrdering, RoundOrdering, ROUND_HIERARCHY,
};
pub use eligibility::validate_teams;
pub use overview::{bracket_overview, BracketOverview, RoundView};
pub use progression::{advance_round, round_winners, AdvanceOutcome};
pub use round_names::{round_name, FINAL, QUARTERFINAL, ROUND_OF_16, SEMIFINAL};
pub use seeding::{bracket_size, plan_first_round, seed_first_round, FirstRoundPlan, SeedOutcome};
