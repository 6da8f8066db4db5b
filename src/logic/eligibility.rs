//! Team eligibility checks run before a bracket is seeded.

use crate::models::{BracketError, Team, Tournament};

/// Validate every team against the tournament's format, stopping at the first violation.
///
/// 1. The team must have a career.
/// 2. The roster must reach the format's minimum size.
/// 3. Every roster member must have the team's career.
pub fn validate_teams(tournament: &Tournament, teams: &[Team]) -> Result<(), BracketError> {
    let required = tournament.format.min_roster();
    for team in teams {
        validate_team(team, required).map_err(|e| {
            log::warn!("Tournament {}: {}", tournament.id, e);
            e
        })?;
    }
    Ok(())
}

fn validate_team(team: &Team, required: usize) -> Result<(), BracketError> {
    let career = team.career_id.ok_or_else(|| BracketError::IneligibleTeam {
        team: team.name.clone(),
    })?;

    if team.roster.len() < required {
        return Err(BracketError::InsufficientRoster {
            team: team.name.clone(),
            required,
            found: team.roster.len(),
        });
    }

    if let Some(player) = team.roster.iter().find(|p| p.career_id != Some(career)) {
        return Err(BracketError::RosterCareerMismatch {
            player: player.name.clone(),
            team: team.name.clone(),
        });
    }

    Ok(())
}
