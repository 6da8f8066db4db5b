//! Advance winners of a completed round into the next one, or crown the champion.

use crate::logic::detection::{detect_latest_round, RoundOrdering};
use crate::logic::round_names::round_name;
use crate::models::{BracketError, GameMatch, TeamId, TournamentId, TournamentState};
use crate::store::{BracketCommit, TournamentStore};
use serde::Serialize;

/// Result of one progression step.
#[derive(Clone, Debug, Serialize)]
pub struct AdvanceOutcome {
    pub previous_round: String,
    /// None when the tournament finished instead of producing a new round.
    pub next_round: Option<String>,
    pub matches_created: Vec<GameMatch>,
    pub champion: Option<TeamId>,
    pub finished: bool,
}

/// Winners of a round in bracket order. Every match must be finished with a winner.
pub fn round_winners(round: &str, matches: &[GameMatch]) -> Result<Vec<TeamId>, BracketError> {
    if matches.is_empty() {
        return Err(BracketError::RoundNotFound(round.to_string()));
    }

    let finished = matches.iter().filter(|m| m.is_finished()).count();
    if finished != matches.len() {
        return Err(BracketError::IncompleteRound {
            round: round.to_string(),
            finished,
            total: matches.len(),
        });
    }

    let mut ordered: Vec<&GameMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| m.bracket_order);

    ordered
        .into_iter()
        .map(|m| match m.winner {
            Some(w) if m.involves(w) => Ok(w),
            Some(w) => Err(BracketError::InvalidResult(format!(
                "winner {} did not play match {}",
                w, m.id
            ))),
            None => Err(BracketError::MissingWinner { match_id: m.id }),
        })
        .collect()
}

/// Advance from `from_round`, or from the latest generated round when `None`.
///
/// Teams that took a bye in the round fill the first bracket slots, followed by the
/// match winners in bracket order. With one team left the tournament is marked
/// `finalizado` and no matches are created; repeating the call on a finished tournament
/// returns the same champion without writing. Otherwise the advancing teams are paired
/// 1-2, 3-4, ... into the next round.
pub fn advance_round<S, O>(
    store: &mut S,
    tournament_id: TournamentId,
    from_round: Option<&str>,
    ordering: &O,
) -> Result<AdvanceOutcome, BracketError>
where
    S: TournamentStore + ?Sized,
    O: RoundOrdering + ?Sized,
{
    let tournament = store.tournament(tournament_id)?;
    if !matches!(
        tournament.state,
        TournamentState::InPlay | TournamentState::Finished
    ) {
        return Err(BracketError::InvalidState {
            expected: "en_juego",
            found: tournament.state,
        });
    }

    let round = match from_round {
        Some(r) => r.to_string(),
        None => detect_latest_round(&*store, tournament_id, ordering)?,
    };

    let matches = store.round_matches(tournament_id, &round)?;
    let winners = round_winners(&round, &matches)?;
    let mut advancing = store.round_byes(tournament_id, &round)?;
    advancing.extend(winners);

    if let [champion] = advancing[..] {
        if tournament.state != TournamentState::Finished {
            store.commit(BracketCommit {
                tournament_id,
                matches: Vec::new(),
                byes: Vec::new(),
                state: Some(TournamentState::Finished),
            })?;
            log::info!(
                "Tournament {} finished after '{}': champion {}",
                tournament_id,
                round,
                champion
            );
        }
        return Ok(AdvanceOutcome {
            previous_round: round,
            next_round: None,
            matches_created: Vec::new(),
            champion: Some(champion),
            finished: true,
        });
    }

    if advancing.is_empty() || advancing.len() % 2 != 0 {
        let err = BracketError::BrokenBracket {
            round: round.clone(),
            winners: advancing.len(),
        };
        log::error!("Tournament {}: {}", tournament_id, err);
        return Err(err);
    }

    let next = round_name(advancing.len());
    if store.round_labels(tournament_id)?.contains(&next) {
        return Err(BracketError::RoundAlreadyExists(next));
    }
    if tournament.state == TournamentState::Finished {
        return Err(BracketError::InvalidState {
            expected: "en_juego",
            found: tournament.state,
        });
    }

    let created: Vec<GameMatch> = advancing
        .chunks_exact(2)
        .zip(1..)
        .map(|(pair, order)| {
            GameMatch::new(tournament_id, pair[0], pair[1], next.as_str(), order)
        })
        .collect();

    store.commit(BracketCommit {
        tournament_id,
        matches: created.clone(),
        byes: Vec::new(),
        state: None,
    })?;

    log::info!(
        "Tournament {} advanced '{}' -> '{}' ({} match(es))",
        tournament_id,
        round,
        next,
        created.len()
    );

    Ok(AdvanceOutcome {
        previous_round: round,
        next_round: Some(next),
        matches_created: created,
        champion: None,
        finished: false,
    })
}
