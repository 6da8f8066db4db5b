//! Single-elimination bracket engine: library with models, persistence port and bracket logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance_round, bracket_overview, bracket_size, detect_latest_round, plan_first_round,
    round_name, round_winners, seed_first_round, sort_rounds, validate_teams, AdvanceOutcome,
    BracketOverview, FirstRoundPlan, HierarchyOrdering, RoundOrdering, RoundView, SeedOutcome,
};
pub use models::{
    normalize_pair, BracketError, CareerId, ErrorKind, GameMatch, Gender, MatchId, MatchState,
    PlayerId, PlayerRef, Team, TeamId, Tournament, TournamentFormat, TournamentId,
    TournamentState, TournamentType,
};
pub use store::{BracketCommit, MemoryStore, TournamentStore};
