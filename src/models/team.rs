//! Team and roster entries.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a career (degree program) a team represents.
pub type CareerId = Uuid;

pub type PlayerId = Uuid;

/// A player registered on a team roster, with their own career affiliation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    /// None if the player has no career on record.
    pub career_id: Option<CareerId>,
}

impl PlayerRef {
    pub fn new(name: impl Into<String>, career_id: Option<CareerId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            career_id,
        }
    }
}

/// A team entered in a tournament. Every roster member must share the team's career.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub career_id: Option<CareerId>,
    pub roster: Vec<PlayerRef>,
}

impl Team {
    pub fn new(
        tournament_id: TournamentId,
        name: impl Into<String>,
        career_id: Option<CareerId>,
        roster: Vec<PlayerRef>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            career_id,
            roster,
        }
    }
}
