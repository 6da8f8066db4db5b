//! Shared fixtures: tournaments with eligible teams in a MemoryStore.

#![allow(dead_code)]

use bracket_engine::{
    CareerId, Gender, MemoryStore, PlayerRef, Team, TeamId, Tournament, TournamentFormat,
    TournamentId, TournamentType,
};
use uuid::Uuid;

pub fn roster(size: usize, career: Option<CareerId>) -> Vec<PlayerRef> {
    (0..size)
        .map(|i| PlayerRef::new(format!("Player {i}"), career))
        .collect()
}

pub fn eligible_team(tournament_id: TournamentId, name: &str, format: TournamentFormat) -> Team {
    let career = Uuid::new_v4();
    Team::new(tournament_id, name, Some(career), roster(format.min_roster(), Some(career)))
}

pub fn new_tournament(format: TournamentFormat) -> Tournament {
    Tournament::new(format, Gender::Mixed, 2026, 2, TournamentType::Intercarrera)
}

/// A `creado` 5v5 tournament with `n` eligible teams.
pub fn store_with_teams(n: usize) -> (MemoryStore, TournamentId, Vec<TeamId>) {
    let mut store = MemoryStore::new();
    let id = store.insert_tournament(new_tournament(TournamentFormat::FiveASide));
    let teams = (0..n)
        .map(|i| {
            store
                .insert_team(eligible_team(id, &format!("Team {i}"), TournamentFormat::FiveASide))
                .unwrap()
        })
        .collect();
    (store, id, teams)
}
