//! Infer which round of a tournament was generated last.

use crate::logic::round_names::{FINAL, QUARTERFINAL, ROUND_OF_16, SEMIFINAL};
use crate::models::{BracketError, TournamentId};
use crate::store::TournamentStore;
use std::cmp::Ordering;

/// Known rounds from earliest to latest.
pub const ROUND_HIERARCHY: [&str; 4] = [ROUND_OF_16, QUARTERFINAL, SEMIFINAL, FINAL];

/// Orders round labels from earliest (`Less`) to latest (`Greater`).
pub trait RoundOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Position in [`ROUND_HIERARCHY`]; labels outside it come before every known round
/// and compare among themselves in reverse lexicographic order.
///
/// Generic `ronda_<n>` labels are not compared numerically, so brackets above 16
/// teams can be misordered.
#[derive(Clone, Copy, Debug, Default)]
pub struct HierarchyOrdering;

impl RoundOrdering for HierarchyOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let pos = |label: &str| ROUND_HIERARCHY.iter().position(|r| *r == label);
        match (pos(a), pos(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => b.cmp(a),
        }
    }
}

/// Sort labels earliest first.
pub fn sort_rounds<O>(labels: &mut [String], ordering: &O)
where
    O: RoundOrdering + ?Sized,
{
    labels.sort_by(|a, b| ordering.compare(a, b));
}

/// Latest round present among the tournament's persisted matches.
pub fn detect_latest_round<S, O>(
    store: &S,
    tournament_id: TournamentId,
    ordering: &O,
) -> Result<String, BracketError>
where
    S: TournamentStore + ?Sized,
    O: RoundOrdering + ?Sized,
{
    let latest = store
        .round_labels(tournament_id)?
        .into_iter()
        .max_by(|a, b| ordering.compare(a, b))
        .ok_or(BracketError::NoRounds)?;
    log::debug!("Tournament {}: latest round is '{}'", tournament_id, latest);
    Ok(latest)
}
