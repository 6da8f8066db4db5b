//! Read-only view of a tournament's bracket, round by round.

use crate::logic::detection::{sort_rounds, RoundOrdering};
use crate::models::{BracketError, GameMatch, TeamId, TournamentId, TournamentState};
use crate::store::TournamentStore;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub round: String,
    pub matches: Vec<GameMatch>,
    /// Teams that skipped this round and advance directly.
    pub byes: Vec<TeamId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BracketOverview {
    pub tournament_id: TournamentId,
    pub state: TournamentState,
    /// Earliest round first.
    pub rounds: Vec<RoundView>,
    /// Set once the tournament is `finalizado`.
    pub champion: Option<TeamId>,
}

pub fn bracket_overview<S, O>(
    store: &S,
    tournament_id: TournamentId,
    ordering: &O,
) -> Result<BracketOverview, BracketError>
where
    S: TournamentStore + ?Sized,
    O: RoundOrdering + ?Sized,
{
    let tournament = store.tournament(tournament_id)?;
    let mut labels = store.round_labels(tournament_id)?;
    sort_rounds(&mut labels, ordering);

    let rounds = labels
        .into_iter()
        .map(|round| {
            let matches = store.round_matches(tournament_id, &round)?;
            let byes = store.round_byes(tournament_id, &round)?;
            Ok(RoundView {
                round,
                matches,
                byes,
            })
        })
        .collect::<Result<Vec<_>, BracketError>>()?;

    let champion = match (tournament.state, rounds.last()) {
        (TournamentState::Finished, Some(last)) if last.matches.len() == 1 => {
            last.matches[0].winner
        }
        _ => None,
    };

    Ok(BracketOverview {
        tournament_id,
        state: tournament.state,
        rounds,
        champion,
    })
}
