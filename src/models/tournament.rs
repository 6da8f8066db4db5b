//! Tournament record and its lifecycle state.

use crate::models::error::BracketError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament. The engine only moves `creado -> en_juego -> finalizado`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TournamentState {
    /// Registered, teams can still be added; no matches yet.
    #[default]
    #[serde(rename = "creado")]
    Created,
    /// Bracket seeded, rounds being played.
    #[serde(rename = "en_juego")]
    InPlay,
    /// Champion decided.
    #[serde(rename = "finalizado")]
    Finished,
    /// Cancelled by the administration layer.
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl TournamentState {
    pub fn label(self) -> &'static str {
        match self {
            TournamentState::Created => "creado",
            TournamentState::InPlay => "en_juego",
            TournamentState::Finished => "finalizado",
            TournamentState::Cancelled => "cancelado",
        }
    }
}

impl std::fmt::Display for TournamentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Game format; each one implies a minimum roster size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TournamentFormat {
    #[serde(rename = "5v5")]
    FiveASide,
    #[serde(rename = "7v7")]
    SevenASide,
    #[serde(rename = "8v8")]
    EightASide,
    #[serde(rename = "11v11")]
    ElevenASide,
}

impl TournamentFormat {
    /// Minimum number of players a team must register for this format.
    pub fn min_roster(self) -> usize {
        match self {
            TournamentFormat::FiveASide => 5,
            TournamentFormat::SevenASide => 7,
            TournamentFormat::EightASide => 8,
            TournamentFormat::ElevenASide => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TournamentFormat::FiveASide => "5v5",
            TournamentFormat::SevenASide => "7v7",
            TournamentFormat::EightASide => "8v8",
            TournamentFormat::ElevenASide => "11v11",
        }
    }
}

impl FromStr for TournamentFormat {
    type Err = BracketError;

    /// Unknown labels are rejected; there is no fallback minimum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5v5" => Ok(TournamentFormat::FiveASide),
            "7v7" => Ok(TournamentFormat::SevenASide),
            "8v8" => Ok(TournamentFormat::EightASide),
            "11v11" => Ok(TournamentFormat::ElevenASide),
            other => Err(BracketError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "masculino")]
    Male,
    #[serde(rename = "femenino")]
    Female,
    #[serde(rename = "mixto")]
    Mixed,
}

/// Freshman-only (`mechon`) or open inter-career tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    Mechon,
    Intercarrera,
}

/// Tournament record as owned by the administration layer. The engine reads
/// `format` and `state` and writes state transitions only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub format: TournamentFormat,
    pub gender: Gender,
    pub year: i32,
    pub semester: u8,
    pub state: TournamentState,
    #[serde(rename = "type")]
    pub kind: TournamentType,
}

impl Tournament {
    /// Create a new tournament in `creado` state.
    pub fn new(
        format: TournamentFormat,
        gender: Gender,
        year: i32,
        semester: u8,
        kind: TournamentType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            format,
            gender,
            year,
            semester,
            state: TournamentState::Created,
            kind,
        }
    }
}
