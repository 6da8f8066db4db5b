//! Data structures for the bracket engine: tournaments, teams, matches, errors.

mod error;
mod game;
mod team;
mod tournament;

pub use error::{BracketError, ErrorKind};
pub use game::{normalize_pair, GameMatch, MatchId, MatchState};
pub use team::{CareerId, PlayerId, PlayerRef, Team, TeamId};
pub use tournament::{
    Gender, Tournament, TournamentFormat, TournamentId, TournamentState, TournamentType,
};
