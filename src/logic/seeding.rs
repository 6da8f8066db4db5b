//! First round: random draw, byes and initial pairings.

use crate::logic::eligibility::validate_teams;
use crate::logic::round_names::round_name;
use crate::models::{BracketError, GameMatch, TeamId, TournamentId, TournamentState};
use crate::store::{BracketCommit, TournamentStore};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Result of seeding a tournament.
#[derive(Clone, Debug, Serialize)]
pub struct SeedOutcome {
    /// Label of the first round, named after the bracket size.
    pub round: String,
    pub matches_created: Vec<GameMatch>,
    /// Teams that skip the first round.
    pub bye_teams: Vec<TeamId>,
    /// Smallest power of two holding every team.
    pub bracket_size: usize,
}

/// Shape of a first round before it is turned into matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FirstRoundPlan {
    pub bracket_size: usize,
    pub byes: Vec<TeamId>,
    /// Pairs in bracket order, not yet normalized.
    pub pairs: Vec<(TeamId, TeamId)>,
}

/// Smallest power of two that is at least `n` (and at least 2).
pub fn bracket_size(n: usize) -> usize {
    n.max(2).next_power_of_two()
}

/// Shuffle the entrants, hand the first `bracket_size - n` of them a bye and pair
/// the rest in order.
pub fn plan_first_round<R>(team_ids: &[TeamId], rng: &mut R) -> FirstRoundPlan
where
    R: Rng + ?Sized,
{
    let mut drawn = team_ids.to_vec();
    drawn.shuffle(rng);

    let size = bracket_size(drawn.len());
    let bye_count = (size - drawn.len()).min(drawn.len());
    let playing = drawn.split_off(bye_count);

    let pairs = playing
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    FirstRoundPlan {
        bracket_size: size,
        byes: drawn,
        pairs,
    }
}

/// Seed a tournament: validate teams, draw the first round and move the tournament to `en_juego`.
///
/// Rejected as a whole when matches already exist, when the tournament is not `creado`,
/// when fewer than two teams entered, or when any team is ineligible.
pub fn seed_first_round<S, R>(
    store: &mut S,
    tournament_id: TournamentId,
    rng: &mut R,
) -> Result<SeedOutcome, BracketError>
where
    S: TournamentStore + ?Sized,
    R: Rng + ?Sized,
{
    let tournament = store.tournament(tournament_id)?;

    let existing_matches = store.match_count(tournament_id)?;
    if existing_matches > 0 {
        return Err(BracketError::AlreadySeeded { existing_matches });
    }
    if tournament.state != TournamentState::Created {
        return Err(BracketError::InvalidState {
            expected: "creado",
            found: tournament.state,
        });
    }

    let teams = store.teams(tournament_id)?;
    if teams.len() < 2 {
        return Err(BracketError::InsufficientTeams { found: teams.len() });
    }
    validate_teams(&tournament, &teams)?;

    let team_ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    let plan = plan_first_round(&team_ids, rng);
    let round = round_name(plan.bracket_size);

    let matches: Vec<GameMatch> = plan
        .pairs
        .iter()
        .zip(1..)
        .map(|(&(first, second), order)| {
            GameMatch::new(tournament_id, first, second, round.as_str(), order)
        })
        .collect();

    store.commit(BracketCommit {
        tournament_id,
        matches: matches.clone(),
        byes: plan.byes.clone(),
        state: Some(TournamentState::InPlay),
    })?;

    log::info!(
        "Tournament {} seeded: {} teams, bracket of {}, {} match(es) in '{}', {} bye(s)",
        tournament_id,
        teams.len(),
        plan.bracket_size,
        matches.len(),
        round,
        plan.byes.len()
    );
    log::debug!("Tournament {} byes: {:?}", tournament_id, plan.byes);

    Ok(SeedOutcome {
        round,
        matches_created: matches,
        bye_teams: plan.byes,
        bracket_size: plan.bracket_size,
    })
}
