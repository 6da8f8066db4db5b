//! Integration tests for round detection and bracket progression.

mod common;

use bracket_engine::{
    advance_round, bracket_overview, detect_latest_round, normalize_pair, seed_first_round,
    BracketCommit, BracketError, GameMatch, HierarchyOrdering, MatchState, MemoryStore, Team,
    TeamId, Tournament, TournamentFormat, TournamentId, TournamentState, TournamentStore,
};
use common::{eligible_team, new_tournament, store_with_teams};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn seeded(n: usize) -> (MemoryStore, TournamentId, String) {
    let (mut store, id, _) = store_with_teams(n);
    let outcome = seed_first_round(&mut store, id, &mut StdRng::seed_from_u64(11)).unwrap();
    (store, id, outcome.round)
}

/// Record a 2-1 win for `team_a` in every match of the round; returns winners in bracket order.
fn finish_round(store: &mut MemoryStore, id: TournamentId, round: &str) -> Vec<TeamId> {
    let matches = store.round_matches(id, round).unwrap();
    for m in &matches {
        store.record_result(m.id, 2, 1).unwrap();
    }
    matches.iter().map(|m| m.team_a).collect()
}

fn advance(
    store: &mut MemoryStore,
    id: TournamentId,
) -> Result<bracket_engine::AdvanceOutcome, BracketError> {
    advance_round(store, id, None, &HierarchyOrdering)
}

#[test]
fn two_teams_finish_after_one_match() {
    let (mut store, id, round) = seeded(2);
    assert_eq!(round, "final");
    let winners = finish_round(&mut store, id, &round);

    let outcome = advance(&mut store, id).unwrap();
    assert!(outcome.finished);
    assert_eq!(outcome.champion, Some(winners[0]));
    assert_eq!(outcome.previous_round, "final");
    assert_eq!(outcome.next_round, None);
    assert!(outcome.matches_created.is_empty());
    assert_eq!(store.match_count(id).unwrap(), 1);
    assert_eq!(store.tournament(id).unwrap().state, TournamentState::Finished);
}

#[test]
fn winners_are_paired_in_bracket_order() {
    let (mut store, id, round) = seeded(8);
    assert_eq!(round, "cuartos");
    let w = finish_round(&mut store, id, &round);
    assert_eq!(w.len(), 4);

    let outcome = advance(&mut store, id).unwrap();
    assert_eq!(outcome.previous_round, "cuartos");
    assert_eq!(outcome.next_round.as_deref(), Some("semifinal"));
    assert!(!outcome.finished);

    let semis = store.round_matches(id, "semifinal").unwrap();
    assert_eq!(semis.len(), 2);
    assert_eq!((semis[0].team_a, semis[0].team_b), normalize_pair(w[0], w[1]));
    assert_eq!((semis[1].team_a, semis[1].team_b), normalize_pair(w[2], w[3]));
    assert_eq!(semis[0].bracket_order, 1);
    assert_eq!(semis[1].bracket_order, 2);
    assert!(semis.iter().all(|m| m.state == MatchState::Pending));
}

#[test]
fn full_bracket_of_sixteen_reaches_a_champion() {
    let (mut store, id, mut round) = seeded(16);
    assert_eq!(round, "octavos");
    let mut labels = vec![round.clone()];
    loop {
        finish_round(&mut store, id, &round);
        let outcome = advance(&mut store, id).unwrap();
        if outcome.finished {
            assert!(outcome.champion.is_some());
            break;
        }
        round = outcome.next_round.unwrap();
        labels.push(round.clone());
    }
    assert_eq!(labels, vec!["octavos", "cuartos", "semifinal", "final"]);
    assert_eq!(store.match_count(id).unwrap(), 8 + 4 + 2 + 1);

    let overview = bracket_overview(&store, id, &HierarchyOrdering).unwrap();
    let order: Vec<_> = overview.rounds.iter().map(|r| r.round.as_str()).collect();
    assert_eq!(order, vec!["octavos", "cuartos", "semifinal", "final"]);
    assert_eq!(overview.state, TournamentState::Finished);
    assert_eq!(overview.champion, overview.rounds[3].matches[0].winner);
}

#[test]
fn incomplete_round_cannot_advance() {
    let (mut store, id, round) = seeded(4);
    assert_eq!(round, "semifinal");
    let first = store.round_matches(id, &round).unwrap()[0].id;
    store.record_result(first, 3, 0).unwrap();

    assert_eq!(
        advance(&mut store, id).unwrap_err(),
        BracketError::IncompleteRound {
            round: "semifinal".to_string(),
            finished: 1,
            total: 2,
        }
    );
    assert_eq!(store.match_count(id).unwrap(), 2);
}

#[test]
fn played_but_not_finalized_match_blocks_progression() {
    let (mut store, id, round) = seeded(2);
    let m = store.round_matches(id, &round).unwrap()[0].id;
    store.set_match_state(m, MatchState::Played).unwrap();
    assert!(matches!(
        advance(&mut store, id),
        Err(BracketError::IncompleteRound { finished: 0, total: 1, .. })
    ));
}

#[test]
fn second_advance_of_same_round_is_rejected() {
    let (mut store, id, round) = seeded(4);
    finish_round(&mut store, id, &round);
    advance(&mut store, id).unwrap();

    assert_eq!(
        advance_round(&mut store, id, Some("semifinal"), &HierarchyOrdering).unwrap_err(),
        BracketError::RoundAlreadyExists("final".to_string())
    );
    assert_eq!(store.match_count(id).unwrap(), 3);
}

#[test]
fn repeated_advance_after_final_is_a_no_op() {
    let (mut store, id, round) = seeded(4);
    finish_round(&mut store, id, &round);
    advance(&mut store, id).unwrap();
    let champion = finish_round(&mut store, id, "final")[0];

    let first = advance(&mut store, id).unwrap();
    let second = advance(&mut store, id).unwrap();
    assert!(first.finished && second.finished);
    assert_eq!(first.champion, Some(champion));
    assert_eq!(second.champion, Some(champion));
    assert_eq!(store.match_count(id).unwrap(), 3);
    assert_eq!(store.tournament(id).unwrap().state, TournamentState::Finished);
}

#[test]
fn unknown_round_is_not_found() {
    let (mut store, id, _) = seeded(4);
    assert_eq!(
        advance_round(&mut store, id, Some("octavos"), &HierarchyOrdering).unwrap_err(),
        BracketError::RoundNotFound("octavos".to_string())
    );
}

#[test]
fn byes_rejoin_ahead_of_match_winners() {
    let (mut store, id, _) = store_with_teams(5);
    let seed = seed_first_round(&mut store, id, &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(seed.round, "cuartos");
    let byes = seed.bye_teams.clone();
    assert_eq!(byes.len(), 3);
    let winner = finish_round(&mut store, id, "cuartos")[0];

    let outcome = advance(&mut store, id).unwrap();
    assert_eq!(outcome.next_round.as_deref(), Some("semifinal"));
    let semis = &outcome.matches_created;
    assert_eq!(semis.len(), 2);
    assert_eq!((semis[0].team_a, semis[0].team_b), normalize_pair(byes[0], byes[1]));
    assert_eq!((semis[1].team_a, semis[1].team_b), normalize_pair(byes[2], winner));
}

#[test]
fn odd_fields_play_through_to_a_champion() {
    for n in [3, 5, 6, 7, 11] {
        let (mut store, id, teams) = store_with_teams(n);
        let mut rng = StdRng::seed_from_u64(n as u64);
        let seed = seed_first_round(&mut store, id, &mut rng).unwrap();
        let mut round = seed.round.clone();
        let mut second_round_entrants: Vec<TeamId> = seed.bye_teams.clone();
        let mut rounds_played = 0;

        let champion = loop {
            let winners = finish_round(&mut store, id, &round);
            if rounds_played == 0 {
                second_round_entrants.extend(winners);
            }
            rounds_played += 1;
            let outcome = advance(&mut store, id).unwrap();
            if outcome.finished {
                break outcome.champion.unwrap();
            }
            round = outcome.next_round.unwrap();
        };

        assert_eq!(second_round_entrants.len(), seed.bracket_size / 2);
        assert_eq!(rounds_played, seed.bracket_size.trailing_zeros() as usize);
        assert_eq!(store.match_count(id).unwrap(), n - 1);
        assert!(teams.contains(&champion));

        let matches = store.matches(id).unwrap();
        for team in &teams {
            let played = matches.iter().any(|m| m.involves(*team));
            assert!(played || seed.bye_teams.contains(team));
        }
        for team in &seed.bye_teams {
            assert!(matches.iter().any(|m| m.involves(*team)));
        }
        assert_eq!(store.tournament(id).unwrap().state, TournamentState::Finished);
    }
}

#[test]
fn detection_needs_at_least_one_round() {
    let (store, id, _) = store_with_teams(4);
    assert_eq!(
        detect_latest_round(&store, id, &HierarchyOrdering).unwrap_err(),
        BracketError::NoRounds
    );
}

#[test]
fn detection_picks_latest_round() {
    let (mut store, id, round) = seeded(8);
    finish_round(&mut store, id, &round);
    advance(&mut store, id).unwrap();
    assert_eq!(
        detect_latest_round(&store, id, &HierarchyOrdering).unwrap(),
        "semifinal"
    );
}

#[test]
fn generic_rounds_come_before_named_ones() {
    let (mut store, id, round) = seeded(32);
    assert_eq!(round, "ronda_32");
    finish_round(&mut store, id, &round);
    let outcome = advance(&mut store, id).unwrap();
    assert_eq!(outcome.next_round.as_deref(), Some("octavos"));
    assert_eq!(
        detect_latest_round(&store, id, &HierarchyOrdering).unwrap(),
        "octavos"
    );
}

#[test]
fn created_or_cancelled_tournaments_cannot_advance() {
    let (mut store, id, _) = store_with_teams(4);
    assert!(matches!(
        advance(&mut store, id),
        Err(BracketError::InvalidState { found: TournamentState::Created, .. })
    ));

    let (mut store, id, _) = seeded(4);
    store.cancel_tournament(id).unwrap();
    assert!(matches!(
        advance(&mut store, id),
        Err(BracketError::InvalidState { found: TournamentState::Cancelled, .. })
    ));
}

#[test]
fn store_rejects_existing_round_and_repeated_pairing() {
    let (mut store, id, round) = seeded(4);
    let semis = store.round_matches(id, &round).unwrap();

    let again = GameMatch::new(id, semis[0].team_a, semis[1].team_a, round.as_str(), 3);
    assert_eq!(
        store
            .commit(BracketCommit {
                tournament_id: id,
                matches: vec![again],
                byes: Vec::new(),
                state: None,
            })
            .unwrap_err(),
        BracketError::RoundAlreadyExists("semifinal".to_string())
    );

    let rematch = GameMatch::new(id, semis[0].team_b, semis[0].team_a, "final", 1);
    assert!(matches!(
        store.commit(BracketCommit {
            tournament_id: id,
            matches: vec![rematch],
            byes: Vec::new(),
            state: Some(TournamentState::Finished),
        }),
        Err(BracketError::DuplicateFixture { .. })
    ));
    assert_eq!(store.match_count(id).unwrap(), 2);
    assert_eq!(store.tournament(id).unwrap().state, TournamentState::InPlay);
}

#[test]
fn draws_are_rejected() {
    let (mut store, id, round) = seeded(2);
    let m = store.round_matches(id, &round).unwrap()[0].id;
    assert!(matches!(
        store.record_result(m, 1, 1),
        Err(BracketError::InvalidResult(_))
    ));
}

/// Store fake that accepts whatever matches it is given, for corrupted-data cases.
struct FakeStore {
    tournament: Tournament,
    teams: Vec<Team>,
    matches: Vec<GameMatch>,
    byes: HashMap<String, Vec<TeamId>>,
}

impl FakeStore {
    fn in_play(team_count: usize) -> Self {
        let mut tournament = new_tournament(TournamentFormat::FiveASide);
        tournament.state = TournamentState::InPlay;
        let teams = (0..team_count)
            .map(|i| eligible_team(tournament.id, &format!("T{i}"), TournamentFormat::FiveASide))
            .collect();
        Self {
            tournament,
            teams,
            matches: Vec::new(),
            byes: HashMap::new(),
        }
    }

    fn finished_match(
        &self,
        a: usize,
        b: usize,
        round: &str,
        order: u32,
        winner: Option<usize>,
    ) -> GameMatch {
        let (team_a, team_b) = (self.teams[a].id, self.teams[b].id);
        let mut m = GameMatch::new(self.tournament.id, team_a, team_b, round, order);
        m.state = MatchState::Finished;
        m.winner = winner.map(|w| self.teams[w].id);
        m
    }
}

impl TournamentStore for FakeStore {
    fn tournament(&self, _id: TournamentId) -> Result<Tournament, BracketError> {
        Ok(self.tournament.clone())
    }

    fn teams(&self, _id: TournamentId) -> Result<Vec<Team>, BracketError> {
        Ok(self.teams.clone())
    }

    fn matches(&self, _id: TournamentId) -> Result<Vec<GameMatch>, BracketError> {
        Ok(self.matches.clone())
    }

    fn round_byes(&self, _id: TournamentId, round: &str) -> Result<Vec<TeamId>, BracketError> {
        Ok(self.byes.get(round).cloned().unwrap_or_default())
    }

    fn commit(&mut self, commit: BracketCommit) -> Result<(), BracketError> {
        if let Some(state) = commit.state {
            self.tournament.state = state;
        }
        if let Some(first) = commit.matches.first() {
            self.byes.insert(first.round.clone(), commit.byes.clone());
        }
        self.matches.extend(commit.matches);
        Ok(())
    }
}

#[test]
fn finished_match_without_winner_is_reported() {
    let mut store = FakeStore::in_play(4);
    let good = store.finished_match(0, 1, "semifinal", 1, Some(0));
    let bad = store.finished_match(2, 3, "semifinal", 2, None);
    let bad_id = bad.id;
    store.matches = vec![good, bad];
    let id = store.tournament.id;

    assert_eq!(
        advance_round(&mut store, id, None, &HierarchyOrdering).unwrap_err(),
        BracketError::MissingWinner { match_id: bad_id }
    );
    assert_eq!(store.matches.len(), 2);
}

#[test]
fn odd_winner_count_is_a_broken_bracket() {
    let mut store = FakeStore::in_play(6);
    store.matches = vec![
        store.finished_match(0, 1, "cuartos", 1, Some(0)),
        store.finished_match(2, 3, "cuartos", 2, Some(2)),
        store.finished_match(4, 5, "cuartos", 3, Some(4)),
    ];
    let id = store.tournament.id;

    assert_eq!(
        advance_round(&mut store, id, Some("cuartos"), &HierarchyOrdering).unwrap_err(),
        BracketError::BrokenBracket {
            round: "cuartos".to_string(),
            winners: 3,
        }
    );
    assert_eq!(store.matches.len(), 3);
    assert_eq!(store.tournament.state, TournamentState::InPlay);
}

#[test]
fn winners_follow_bracket_order_not_storage_order() {
    let mut store = FakeStore::in_play(4);
    // Stored out of order: bracket position 2 first.
    store.matches = vec![
        store.finished_match(2, 3, "semifinal", 2, Some(3)),
        store.finished_match(0, 1, "semifinal", 1, Some(1)),
    ];
    let id = store.tournament.id;
    let outcome = advance_round(&mut store, id, None, &HierarchyOrdering).unwrap();

    let final_match = &outcome.matches_created[0];
    assert_eq!(outcome.next_round.as_deref(), Some("final"));
    assert_eq!(
        (final_match.team_a, final_match.team_b),
        normalize_pair(store.teams[1].id, store.teams[3].id)
    );
}

#[test]
fn winner_who_did_not_play_is_rejected() {
    let mut store = FakeStore::in_play(5);
    store.matches = vec![
        store.finished_match(0, 1, "semifinal", 1, Some(0)),
        store.finished_match(2, 3, "semifinal", 2, Some(4)),
    ];
    let id = store.tournament.id;

    assert!(matches!(
        advance_round(&mut store, id, None, &HierarchyOrdering),
        Err(BracketError::InvalidResult(_))
    ));
    assert_eq!(store.matches.len(), 2);
    assert_eq!(store.tournament.state, TournamentState::InPlay);
}

#[test]
fn stored_byes_fill_the_first_slots() {
    let mut store = FakeStore::in_play(3);
    store.matches = vec![store.finished_match(1, 2, "semifinal", 1, Some(2))];
    store.byes.insert("semifinal".to_string(), vec![store.teams[0].id]);
    let id = store.tournament.id;

    let outcome = advance_round(&mut store, id, None, &HierarchyOrdering).unwrap();
    assert_eq!(outcome.next_round.as_deref(), Some("final"));
    let final_match = &outcome.matches_created[0];
    assert_eq!(
        (final_match.team_a, final_match.team_b),
        normalize_pair(store.teams[0].id, store.teams[2].id)
    );
}
