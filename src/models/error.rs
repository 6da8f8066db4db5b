//! Error taxonomy for seeding and progression.

use crate::models::game::MatchId;
use crate::models::team::TeamId;
use crate::models::tournament::{TournamentId, TournamentState};

/// Broad class of a [`BracketError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input: ineligible teams, rosters, formats, results.
    Validation,
    /// The tournament or round is not in a state that allows the action.
    State,
    /// A referenced tournament or match does not exist.
    NotFound,
    /// Infrastructure failure in the persistence layer.
    Store,
}

/// Errors that can occur while seeding or advancing a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// A team has no career assigned.
    IneligibleTeam { team: String },
    /// A team's roster is below the format's minimum.
    InsufficientRoster {
        team: String,
        required: usize,
        found: usize,
    },
    /// A roster member has no career, or a career different from the team's.
    RosterCareerMismatch { player: String, team: String },
    /// Fewer than two teams entered.
    InsufficientTeams { found: usize },
    /// The format label does not map to a known minimum roster.
    UnsupportedFormat(String),
    /// Matches already exist for the tournament.
    AlreadySeeded { existing_matches: usize },
    /// Tournament lifecycle state does not allow this operation.
    InvalidState {
        expected: &'static str,
        found: TournamentState,
    },
    /// No rounds have been generated yet.
    NoRounds,
    /// No matches exist for the requested round.
    RoundNotFound(String),
    /// Some matches of the round are not finished yet.
    IncompleteRound {
        round: String,
        finished: usize,
        total: usize,
    },
    /// A finished match has no winner recorded.
    MissingWinner { match_id: MatchId },
    /// Winner count cannot form a bracket layer; upstream data is inconsistent.
    BrokenBracket { round: String, winners: usize },
    /// The next round has already been generated.
    RoundAlreadyExists(String),
    /// The same two teams would meet twice in one tournament.
    DuplicateFixture { team_a: TeamId, team_b: TeamId },
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// A result entry that cannot decide a winner.
    InvalidResult(String),
    /// Opaque persistence failure; the operation was rolled back.
    Store(String),
}

impl BracketError {
    pub fn kind(&self) -> ErrorKind {
        use BracketError::*;
        match self {
            IneligibleTeam { .. }
            | InsufficientRoster { .. }
            | RosterCareerMismatch { .. }
            | InsufficientTeams { .. }
            | UnsupportedFormat(_)
            | InvalidResult(_) => ErrorKind::Validation,
            AlreadySeeded { .. }
            | InvalidState { .. }
            | NoRounds
            | RoundNotFound(_)
            | IncompleteRound { .. }
            | MissingWinner { .. }
            | BrokenBracket { .. }
            | RoundAlreadyExists(_)
            | DuplicateFixture { .. } => ErrorKind::State,
            TournamentNotFound(_) | MatchNotFound(_) => ErrorKind::NotFound,
            Store(_) => ErrorKind::Store,
        }
    }
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::IneligibleTeam { team } => {
                write!(f, "Team '{}' has no career assigned", team)
            }
            BracketError::InsufficientRoster {
                team,
                required,
                found,
            } => write!(
                f,
                "Team '{}' needs at least {} players (has {})",
                team, required, found
            ),
            BracketError::RosterCareerMismatch { player, team } => write!(
                f,
                "Player '{}' does not belong to the career of team '{}'",
                player, team
            ),
            BracketError::InsufficientTeams { found } => {
                write!(f, "Need at least 2 teams to seed a bracket (found {})", found)
            }
            BracketError::UnsupportedFormat(format) => {
                write!(f, "Unsupported tournament format '{}'", format)
            }
            BracketError::AlreadySeeded { existing_matches } => write!(
                f,
                "Tournament already has {} match(es); first round was already generated",
                existing_matches
            ),
            BracketError::InvalidState { expected, found } => write!(
                f,
                "Tournament must be {} (currently {})",
                expected, found
            ),
            BracketError::NoRounds => write!(f, "No rounds have been generated yet"),
            BracketError::RoundNotFound(round) => {
                write!(f, "No matches found for round '{}'", round)
            }
            BracketError::IncompleteRound {
                round,
                finished,
                total,
            } => write!(
                f,
                "Round '{}' is not complete ({}/{} matches finished)",
                round, finished, total
            ),
            BracketError::MissingWinner { match_id } => {
                write!(f, "Match {} is finished but has no winner", match_id)
            }
            BracketError::BrokenBracket { round, winners } => write!(
                f,
                "Round '{}' produced {} winner(s); bracket is inconsistent",
                round, winners
            ),
            BracketError::RoundAlreadyExists(round) => {
                write!(f, "Round '{}' has already been generated", round)
            }
            BracketError::DuplicateFixture { team_a, team_b } => write!(
                f,
                "Teams {} and {} have already been paired in this tournament",
                team_a, team_b
            ),
            BracketError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            BracketError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            BracketError::InvalidResult(msg) => write!(f, "Invalid result: {}", msg),
            BracketError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for BracketError {}
