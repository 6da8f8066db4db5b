//! Persistence port for the engine plus an in-memory implementation.
//!
//! Engine operations read fresh state through [`TournamentStore`] on every
//! call and write through a single [`BracketCommit`], which the store applies
//! atomically: every uniqueness rule is checked before anything is written.

use crate::models::{
    normalize_pair, BracketError, GameMatch, MatchId, MatchState, Team, TeamId, Tournament,
    TournamentId, TournamentState,
};
use std::collections::{HashMap, HashSet};

/// Everything one engine operation writes: new matches, the teams that skip
/// their round, and an optional state transition.
#[derive(Clone, Debug, Default)]
pub struct BracketCommit {
    pub tournament_id: TournamentId,
    pub matches: Vec<GameMatch>,
    /// Teams advancing from the committed round without a match, in bracket order.
    pub byes: Vec<TeamId>,
    pub state: Option<TournamentState>,
}

/// Storage the engine runs against. Implementations must apply `commit` all-or-nothing
/// and reject a round label that already exists for the tournament with
/// [`BracketError::RoundAlreadyExists`].
pub trait TournamentStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament, BracketError>;

    /// Teams of a tournament with rosters loaded, in registration order.
    fn teams(&self, id: TournamentId) -> Result<Vec<Team>, BracketError>;

    /// All matches of a tournament in creation order.
    fn matches(&self, id: TournamentId) -> Result<Vec<GameMatch>, BracketError>;

    /// Teams that advance from `round` on a bye, in bracket order.
    fn round_byes(&self, id: TournamentId, round: &str) -> Result<Vec<TeamId>, BracketError>;

    fn commit(&mut self, commit: BracketCommit) -> Result<(), BracketError>;

    /// Matches of one round sorted by bracket order.
    fn round_matches(
        &self,
        id: TournamentId,
        round: &str,
    ) -> Result<Vec<GameMatch>, BracketError> {
        let mut matches: Vec<GameMatch> = self
            .matches(id)?
            .into_iter()
            .filter(|m| m.round == round)
            .collect();
        matches.sort_by_key(|m| m.bracket_order);
        Ok(matches)
    }

    /// Distinct round labels in first-seen order.
    fn round_labels(&self, id: TournamentId) -> Result<Vec<String>, BracketError> {
        let mut labels: Vec<String> = Vec::new();
        for m in self.matches(id)? {
            if !labels.contains(&m.round) {
                labels.push(m.round);
            }
        }
        Ok(labels)
    }

    fn match_count(&self, id: TournamentId) -> Result<usize, BracketError> {
        Ok(self.matches(id)?.len())
    }
}

/// In-memory store. Also carries the administration-side operations
/// (registration, result entry, cancellation) the engine itself never performs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
    teams: Vec<Team>,
    matches: Vec<GameMatch>,
    byes: HashMap<(TournamentId, String), Vec<TeamId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tournament(&mut self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.tournaments.insert(id, tournament);
        id
    }

    /// Register a team (tournament must still be `creado`).
    pub fn insert_team(&mut self, team: Team) -> Result<TeamId, BracketError> {
        let tournament = self.tournament(team.tournament_id)?;
        if tournament.state != TournamentState::Created {
            return Err(BracketError::InvalidState {
                expected: "creado",
                found: tournament.state,
            });
        }
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<&GameMatch, BracketError> {
        self.matches
            .iter()
            .find(|m| m.id == match_id)
            .ok_or(BracketError::MatchNotFound(match_id))
    }

    fn get_match_mut(&mut self, match_id: MatchId) -> Result<&mut GameMatch, BracketError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(BracketError::MatchNotFound(match_id))
    }

    /// Enter a final score; the higher score wins and the match is finished.
    pub fn record_result(
        &mut self,
        match_id: MatchId,
        score_a: u32,
        score_b: u32,
    ) -> Result<&GameMatch, BracketError> {
        let tournament_id = self.get_match(match_id)?.tournament_id;
        let state = self.tournament(tournament_id)?.state;
        if state != TournamentState::InPlay {
            return Err(BracketError::InvalidState {
                expected: "en_juego",
                found: state,
            });
        }
        if score_a == score_b {
            return Err(BracketError::InvalidResult(
                "a knockout match cannot end in a draw".to_string(),
            ));
        }
        let m = self.get_match_mut(match_id)?;
        if m.is_finished() {
            return Err(BracketError::InvalidResult(format!(
                "match {} is already finished",
                match_id
            )));
        }
        m.score_a = Some(score_a);
        m.score_b = Some(score_b);
        m.winner = Some(if score_a > score_b { m.team_a } else { m.team_b });
        m.state = MatchState::Finished;
        log::info!(
            "Result recorded for match {} ({} {}-{})",
            match_id,
            m.round,
            score_a,
            score_b
        );
        Ok(&*m)
    }

    /// Move a match through its non-terminal states. Finishing goes through `record_result`.
    pub fn set_match_state(
        &mut self,
        match_id: MatchId,
        state: MatchState,
    ) -> Result<(), BracketError> {
        if state == MatchState::Finished {
            return Err(BracketError::InvalidResult(
                "finishing a match requires a score".to_string(),
            ));
        }
        let m = self.get_match_mut(match_id)?;
        if m.is_finished() {
            return Err(BracketError::InvalidResult(format!(
                "match {} is already finished",
                match_id
            )));
        }
        m.state = state;
        Ok(())
    }

    pub fn cancel_tournament(&mut self, id: TournamentId) -> Result<(), BracketError> {
        let t = self
            .tournaments
            .get_mut(&id)
            .ok_or(BracketError::TournamentNotFound(id))?;
        if !matches!(t.state, TournamentState::Created | TournamentState::InPlay) {
            return Err(BracketError::InvalidState {
                expected: "creado or en_juego",
                found: t.state,
            });
        }
        t.state = TournamentState::Cancelled;
        Ok(())
    }

    /// Check every constraint a commit must satisfy without writing anything.
    fn validate(&self, commit: &BracketCommit) -> Result<(), BracketError> {
        let id = commit.tournament_id;
        if !self.tournaments.contains_key(&id) {
            return Err(BracketError::TournamentNotFound(id));
        }
        let team_ids: HashSet<TeamId> = self
            .teams
            .iter()
            .filter(|t| t.tournament_id == id)
            .map(|t| t.id)
            .collect();
        let existing: Vec<&GameMatch> = self
            .matches
            .iter()
            .filter(|m| m.tournament_id == id)
            .collect();

        let mut pairs: HashSet<(TeamId, TeamId)> =
            existing.iter().map(|m| (m.team_a, m.team_b)).collect();
        for m in &commit.matches {
            if m.tournament_id != id {
                return Err(BracketError::Store(format!(
                    "match {} belongs to another tournament",
                    m.id
                )));
            }
            if m.team_a == m.team_b {
                return Err(BracketError::Store(format!(
                    "match {} pairs team {} with itself",
                    m.id, m.team_a
                )));
            }
            if !team_ids.contains(&m.team_a) || !team_ids.contains(&m.team_b) {
                return Err(BracketError::Store(format!(
                    "match {} references a team outside the tournament",
                    m.id
                )));
            }
            if existing.iter().any(|e| e.round == m.round) {
                return Err(BracketError::RoundAlreadyExists(m.round.clone()));
            }
            if !pairs.insert(normalize_pair(m.team_a, m.team_b)) {
                return Err(BracketError::DuplicateFixture {
                    team_a: m.team_a,
                    team_b: m.team_b,
                });
            }
        }

        if !commit.byes.is_empty() {
            let round = match commit.matches.first() {
                Some(m) if commit.matches.iter().all(|o| o.round == m.round) => &m.round,
                _ => {
                    return Err(BracketError::Store(
                        "byes must be committed with the matches of a single round".to_string(),
                    ))
                }
            };
            if self.byes.contains_key(&(id, round.clone())) {
                return Err(BracketError::RoundAlreadyExists(round.clone()));
            }
            let mut seen = HashSet::new();
            for team in &commit.byes {
                let plays = commit.matches.iter().any(|m| m.involves(*team));
                if !team_ids.contains(team) || plays || !seen.insert(*team) {
                    return Err(BracketError::Store(format!(
                        "team {} cannot take a bye in round '{}'",
                        team, round
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TournamentStore for MemoryStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament, BracketError> {
        self.tournaments
            .get(&id)
            .cloned()
            .ok_or(BracketError::TournamentNotFound(id))
    }

    fn teams(&self, id: TournamentId) -> Result<Vec<Team>, BracketError> {
        if !self.tournaments.contains_key(&id) {
            return Err(BracketError::TournamentNotFound(id));
        }
        Ok(self
            .teams
            .iter()
            .filter(|t| t.tournament_id == id)
            .cloned()
            .collect())
    }

    fn matches(&self, id: TournamentId) -> Result<Vec<GameMatch>, BracketError> {
        if !self.tournaments.contains_key(&id) {
            return Err(BracketError::TournamentNotFound(id));
        }
        Ok(self
            .matches
            .iter()
            .filter(|m| m.tournament_id == id)
            .cloned()
            .collect())
    }

    fn round_byes(&self, id: TournamentId, round: &str) -> Result<Vec<TeamId>, BracketError> {
        if !self.tournaments.contains_key(&id) {
            return Err(BracketError::TournamentNotFound(id));
        }
        Ok(self
            .byes
            .get(&(id, round.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn commit(&mut self, commit: BracketCommit) -> Result<(), BracketError> {
        self.validate(&commit)?;
        if let Some(first) = commit.matches.first() {
            if !commit.byes.is_empty() {
                self.byes
                    .insert((commit.tournament_id, first.round.clone()), commit.byes.clone());
            }
        }
        if let Some(state) = commit.state {
            if let Some(t) = self.tournaments.get_mut(&commit.tournament_id) {
                t.state = state;
            }
        }
        self.matches.extend(commit.matches);
        Ok(())
    }
}
