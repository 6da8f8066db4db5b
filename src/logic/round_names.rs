//! Human round labels derived from how many teams (or winners) enter a round.

pub const FINAL: &str = "final";
pub const SEMIFINAL: &str = "semifinal";
pub const QUARTERFINAL: &str = "cuartos";
pub const ROUND_OF_16: &str = "octavos";

/// Label for a round entered by `n` teams. `1` is the terminal case and maps to `final`.
pub fn round_name(n: usize) -> String {
    match n {
        1 | 2 => FINAL.to_string(),
        4 => SEMIFINAL.to_string(),
        8 => QUARTERFINAL.to_string(),
        16 => ROUND_OF_16.to_string(),
        other => format!("ronda_{}", other),
    }
}
