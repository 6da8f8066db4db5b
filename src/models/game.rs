//! Bracket match (fixture) between two teams.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Progress of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_juego")]
    InProgress,
    #[serde(rename = "jugado")]
    Played,
    #[serde(rename = "finalizado")]
    Finished,
}

/// A single bracket match. `team_a < team_b` always holds so a pairing has
/// exactly one stored representation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    /// Round label, e.g. `cuartos`.
    pub round: String,
    /// Left-to-right position within the round, starting at 1.
    pub bracket_order: u32,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    /// None until a result is entered.
    pub winner: Option<TeamId>,
    pub state: MatchState,
    pub created_at: DateTime<Utc>,
}

impl GameMatch {
    /// Create a pending match, normalizing the pair order.
    pub fn new(
        tournament_id: TournamentId,
        first: TeamId,
        second: TeamId,
        round: impl Into<String>,
        bracket_order: u32,
    ) -> Self {
        let (team_a, team_b) = normalize_pair(first, second);
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            team_a,
            team_b,
            round: round.into(),
            bracket_order,
            score_a: None,
            score_b: None,
            winner: None,
            state: MatchState::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == MatchState::Finished
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_a == team || self.team_b == team
    }
}

/// Order two team ids so the smaller one comes first.
pub fn normalize_pair(first: TeamId, second: TeamId) -> (TeamId, TeamId) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}
